use crate::domain::model::{
    EquipmentType, ErrorBody, LoadDetail, LoadSearchApiRequest, LoadSearchCriteria,
    MultipleLoadDetailReturn,
};
use axum::response::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(super::load_search),
    components(schemas(
        LoadSearchApiRequest,
        LoadSearchCriteria,
        MultipleLoadDetailReturn,
        LoadDetail,
        EquipmentType,
        ErrorBody,
    )),
    info(
        title = "TruckStop load search proxy",
        description = "JSON front for the TruckStop LoadSearch SOAP service"
    )
)]
pub struct ApiDoc;

pub async fn document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
