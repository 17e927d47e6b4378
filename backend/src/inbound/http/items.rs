//! Items API handlers.
//!
//! ```text
//! GET    /api/v1/items?status=lost&category=Books&search=calc
//! POST   /api/v1/items
//! GET    /api/v1/items/{id}
//! PUT    /api/v1/items/{id}   {"action":"claim"}
//! DELETE /api/v1/items/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::ports::{ClaimItemRequest, CreateItemRequest, DeleteItemRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::resolve_caller;
use crate::inbound::http::items_dto::{
    ClaimResponse, CreateItemBody, ItemActionBody, ItemResponse, ListItemsParams, MessageResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    RawListFilters, parse_item_id, parse_list_filters, require_claim_action,
};

/// List items matching the filters, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(ListItemsParams),
    responses(
        (status = 200, description = "Matching items", body = [ItemResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "listItems"
)]
#[get("/items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ListItemsParams>,
) -> ApiResult<web::Json<Vec<ItemResponse>>> {
    resolve_caller(&session, state.accounts.as_ref()).await?;
    let query = parse_list_filters(RawListFilters {
        status: params.status.as_deref(),
        category: params.category.as_deref(),
        search: params.search.as_deref(),
    })?;
    let views = state.items_query.list_items(query).await?;
    Ok(web::Json(views.into_iter().map(ItemResponse::from).collect()))
}

/// Report a lost or found item.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemBody,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Email domain not allowed", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "createItem"
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateItemBody>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(&session, state.accounts.as_ref()).await?;
    let view = state
        .items
        .create_item(CreateItemRequest {
            reporter: caller.id(),
            draft: payload.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(view)))
}

/// Fetch one item with its reporter and claimant.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item", body = ItemResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Item not found", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "getItem"
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ItemResponse>> {
    resolve_caller(&session, state.accounts.as_ref()).await?;
    let item_id = parse_item_id(&path)?;
    let view = state.items_query.get_item(item_id).await?;
    Ok(web::Json(view.into()))
}

/// Apply an action to an item. Only `claim` is supported.
///
/// The session is checked first, then the item must exist, and only then is
/// the action validated.
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = ItemActionBody,
    responses(
        (status = 200, description = "Item claimed", body = ClaimResponse),
        (status = 400, description = "Invalid action", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Item not found", body = ErrorSchema),
        (status = 409, description = "Item not claimable or own item", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "updateItem"
)]
#[put("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ItemActionBody>,
) -> ApiResult<web::Json<ClaimResponse>> {
    let caller = resolve_caller(&session, state.accounts.as_ref()).await?;
    let item_id = parse_item_id(&path)?;
    state.items_query.get_item(item_id).await?;
    require_claim_action(&payload.action)?;
    let response = state
        .items
        .claim_item(ClaimItemRequest {
            item_id,
            claimant: caller.id(),
        })
        .await?;
    Ok(web::Json(response.into()))
}

/// Delete an item reported by the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the reporter", body = ErrorSchema),
        (status = 404, description = "Item not found", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "deleteItem"
)]
#[delete("/items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(&session, state.accounts.as_ref()).await?;
    let item_id = parse_item_id(&path)?;
    state
        .items
        .delete_item(DeleteItemRequest {
            item_id,
            requester: caller.id(),
        })
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Item deleted successfully")))
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
