// --- File: crates/givepoint_give/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::models::{AmountDetail, GiveRequest};

#[utoipa::path(
    post,
    path = "/give",
    request_body = GiveRequest,
    responses(
        (status = 204, description = "Gift accepted and charged"),
        (status = 400, description = "Validation failure", body = String),
        (status = 500, description = "Gateway or internal failure", body = String),
        (status = 503, description = "Giving feature disabled"),
        (status = 504, description = "Gateway timeout", body = String),
    ),
    tag = "Giving"
)]
fn doc_give_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_give_handler),
    components(schemas(GiveRequest, AmountDetail)),
    tags((name = "Giving", description = "Donation processing endpoints"))
)]
pub struct GiveApiDoc;
