use fieldlab_core::EntitySchema;
use std::sync::Arc;
use utoipa::openapi::path::{
    OperationBuilder, Parameter, ParameterBuilder, ParameterIn, PathItem, PathItemType,
};
use utoipa::openapi::request_body::{RequestBody, RequestBodyBuilder};
use utoipa::openapi::schema::{
    ArrayBuilder, KnownFormat, ObjectBuilder, Schema, SchemaFormat, SchemaType,
};
use utoipa::openapi::tag::Tag;
use utoipa::openapi::{
    Content, InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder, RefOr, Required, Response,
    ResponseBuilder,
};
use utoipa_swagger_ui::Config;
use warp::Filter;
use warp::{
    http::Uri,
    hyper::{Response as HttpResponse, StatusCode},
    path::{FullPath, Tail},
    Rejection, Reply,
};

pub fn swagger(
    resources: &[&'static EntitySchema],
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let api = Arc::new(build_openapi(resources));
    let config = Arc::new(Config::new(["/api/doc/api.json"]));

    warp::path!("api" / "doc" / "api.json")
        .and(warp::get())
        .map(move || warp::reply::json(api.as_ref()))
        .or(warp::path("api")
            .and(warp::path("doc"))
            .and(warp::get())
            .and(warp::path::full())
            .and(warp::path::tail())
            .and(warp::any().map(move || config.clone()))
            .and_then(serve_swagger))
}

pub(crate) fn build_openapi(resources: &[&'static EntitySchema]) -> OpenApi {
    let mut tags: Vec<Tag> = Vec::new();
    let mut paths = PathsBuilder::new();

    for schema in resources.iter() {
        tags.push(Tag::new(schema.name));
        let collection = format!("/api/{}", schema.name);
        let item = format!("/api/{}/{{id}}", schema.name);
        let batch = format!("/api/{}/batch", schema.name);

        let list = OperationBuilder::new()
            .tag(schema.name)
            .operation_id(Some(format!("list_{}", schema.name)))
            .summary(Some(format!("List {}", schema.name)))
            .parameter(query_param("filter", "JSON object of field filters, `q` searches all text fields"))
            .parameter(query_param("sort", "JSON list `[field, \"ASC\"|\"DESC\"]`"))
            .parameter(query_param("range", "JSON list `[start, end]`, end exclusive"))
            .response("200", response("Page of entities, window and total in `Content-Range`"))
            .response("400", response("Malformed filter, sort or range"));
        let create = OperationBuilder::new()
            .tag(schema.name)
            .operation_id(Some(format!("create_{}", schema.name)))
            .request_body(Some(object_body()))
            .response("201", response("Created entity"))
            .response("400", response("Invalid payload or missing parent"))
            .response("409", response("Duplicate entity"));
        let get = OperationBuilder::new()
            .tag(schema.name)
            .operation_id(Some(format!("get_{}", schema.name)))
            .parameter(id_param())
            .response("200", response("Entity"))
            .response("404", response("Unknown id"));
        let update = OperationBuilder::new()
            .tag(schema.name)
            .operation_id(Some(format!("update_{}", schema.name)))
            .parameter(id_param())
            .request_body(Some(object_body()))
            .response("200", response("Updated entity"))
            .response("404", response("Unknown id"));
        let delete = OperationBuilder::new()
            .tag(schema.name)
            .operation_id(Some(format!("delete_{}", schema.name)))
            .parameter(id_param())
            .response("200", response("Id of the deleted entity"))
            .response("404", response("Unknown id"));
        let delete_batch = OperationBuilder::new()
            .tag(schema.name)
            .operation_id(Some(format!("delete_batch_{}", schema.name)))
            .request_body(Some(ids_body()))
            .response("200", response("Ids of the deleted entities"));

        paths = paths
            .path(&collection, PathItem::new(PathItemType::Get, list))
            .path(&collection, PathItem::new(PathItemType::Post, create))
            .path(&item, PathItem::new(PathItemType::Get, get))
            .path(&item, PathItem::new(PathItemType::Put, update))
            .path(&item, PathItem::new(PathItemType::Delete, delete))
            .path(&batch, PathItem::new(PathItemType::Delete, delete_batch));
    }

    for view in ["raw", "filtered", "summary"] {
        let operation = OperationBuilder::new()
            .tag("instruments")
            .operation_id(Some(format!("instrument_{}", view)))
            .parameter(id_param())
            .parameter(query_param("format", "`json` (default) or `csv`"))
            .response("200", response("Table with the header as first row"))
            .response("404", response("Unknown experiment"));
        paths = paths.path(
            format!("/api/instruments/{{id}}/{}", view),
            PathItem::new(PathItemType::Get, operation),
        );
    }

    let summary = OperationBuilder::new()
        .tag("sensors")
        .operation_id(Some("sensor_data_summary"))
        .parameter(id_param())
        .parameter(query_param("from", "RFC 3339 lower bound, inclusive"))
        .parameter(query_param("until", "RFC 3339 upper bound, exclusive"))
        .response("200", response("Record count and first and last reading"))
        .response("404", response("Unknown sensor"));
    let health = OperationBuilder::new()
        .operation_id(Some("health"))
        .response("200", response("Database reachable"))
        .response("500", response("Database unreachable"));
    paths = paths
        .path(
            "/api/sensors/{id}/summary",
            PathItem::new(PathItemType::Get, summary),
        )
        .path("/healthz", PathItem::new(PathItemType::Get, health));

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("fieldlab")
                .version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
        .tags(Some(tags))
        .paths(paths.build())
        .build()
}

fn response(description: &str) -> RefOr<Response> {
    RefOr::T(ResponseBuilder::new().description(description).build())
}

fn query_param(name: &str, description: &str) -> Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Query)
        .required(Required::False)
        .description(Some(description))
        .schema(Some(RefOr::T(Schema::Object(
            ObjectBuilder::new().schema_type(SchemaType::String).build(),
        ))))
        .build()
}

fn uuid_schema() -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .schema_type(SchemaType::String)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Uuid)))
            .build(),
    ))
}

fn id_param() -> Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(uuid_schema()))
        .build()
}

fn object_body() -> RequestBody {
    RequestBodyBuilder::new()
        .content(
            "application/json",
            Content::new(RefOr::T(Schema::Object(ObjectBuilder::new().build()))),
        )
        .required(Some(Required::True))
        .build()
}

fn ids_body() -> RequestBody {
    let ids = ArrayBuilder::new().items(uuid_schema()).build();
    RequestBodyBuilder::new()
        .content("application/json", Content::new(RefOr::T(Schema::Array(ids))))
        .required(Some(Required::True))
        .build()
}

async fn serve_swagger(
    full_path: FullPath,
    tail: Tail,
    config: Arc<Config<'static>>,
) -> Result<Box<dyn Reply + 'static>, Rejection> {
    if full_path.as_str() == "/api/doc" {
        return Ok(Box::new(warp::redirect::found(Uri::from_static(
            "/api/doc/",
        ))));
    }

    let path = tail.as_str();
    match utoipa_swagger_ui::serve(path, config) {
        Ok(file) => {
            if let Some(file) = file {
                Ok(Box::new(
                    HttpResponse::builder()
                        .header("Content-Type", file.content_type)
                        .body(file.bytes),
                ))
            } else {
                Ok(Box::new(StatusCode::NOT_FOUND))
            }
        }
        Err(error) => Ok(Box::new(
            HttpResponse::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(error.to_string()),
        )),
    }
}
