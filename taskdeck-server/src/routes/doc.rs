use crate::routes::{health, tasks};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "taskdeck-server",
    description = "taskdeck task-tracking API",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(tasks::TasksApi::openapi());
    root
}
