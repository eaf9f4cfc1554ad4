/// How a column is matched, bound and rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// UUID columns, always matched exactly
    Id,
    Text,
    Integer,
    Float,
    Boolean,
    Timestamp,
    Date,
    Json,
    /// Virtual field, a boolean filter on it asks for the existence of child rows
    Relation(&'static Relation),
}

#[derive(Debug, PartialEq)]
pub struct Relation {
    pub table: &'static str,
    pub foreign_key: &'static str,
}

/// Text columns of a parent table taking part in the `q` search
#[derive(Debug, PartialEq)]
pub struct SearchJoin {
    pub table: &'static str,
    pub local_key: &'static str,
    pub columns: &'static [&'static str],
}

#[derive(Debug, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub writable: bool,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Field {
            name,
            kind,
            writable: true,
        }
    }

    pub const fn read_only(name: &'static str, kind: FieldKind) -> Self {
        Field {
            name,
            kind,
            writable: false,
        }
    }

    pub fn is_column(&self) -> bool {
        !matches!(self.kind, FieldKind::Relation(_))
    }
}

/// Static field classification of one entity.
///
/// Every filter and sort request is checked against this table, so a field
/// name that reaches SQL is always one of the `&'static str` declared here.
#[derive(Debug)]
pub struct EntitySchema {
    /// Resource name, used as URL segment and `Content-Range` unit
    pub name: &'static str,
    pub table: &'static str,
    pub fields: &'static [Field],
    pub search_joins: &'static [SearchJoin],
    pub default_order: &'static str,
    /// Column set to `now()` on every update
    pub touch_column: Option<&'static str>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn exact_match_fields(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Id)
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Text)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter().filter(|f| f.is_column())
    }

    pub fn writable_columns(&self) -> impl Iterator<Item = &'static Field> {
        self.columns().filter(|f| f.writable)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static CHILDREN: Relation = Relation {
        table: "child",
        foreign_key: "parent_id",
    };

    static PARENT: EntitySchema = EntitySchema {
        name: "parents",
        table: "parent",
        fields: &[
            Field::read_only("id", FieldKind::Id),
            Field::new("name", FieldKind::Text),
            Field::new("owner_id", FieldKind::Id),
            Field::new("depth", FieldKind::Float),
            Field::new("children", FieldKind::Relation(&CHILDREN)),
        ],
        search_joins: &[],
        default_order: "iterator",
        touch_column: None,
    };

    #[test]
    fn test_field_lookup() {
        assert_eq!(Some(FieldKind::Text), PARENT.field("name").map(|f| f.kind));
        assert!(PARENT.field("nope").is_none());
    }

    #[test]
    fn test_classification() {
        let exact: Vec<&str> = PARENT.exact_match_fields().map(|f| f.name).collect();
        assert_eq!(vec!["id", "owner_id"], exact);

        let text: Vec<&str> = PARENT.searchable_fields().map(|f| f.name).collect();
        assert_eq!(vec!["name"], text);

        let writable: Vec<&str> = PARENT.writable_columns().map(|f| f.name).collect();
        assert_eq!(vec!["name", "owner_id", "depth"], writable);
    }
}
