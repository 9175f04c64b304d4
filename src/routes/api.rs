//! JSON endpoints the roster page script forwards drag events to.

use actix_web::{HttpResponse, Responder, get, post, web};
use chrono::Utc;

use crate::dto::roster::{ApiError, DragOverResponse, DragScrollResponse, RosterView};
use crate::forms::roster::{
    DragOverForm, DragOverPayload, DragScrollForm, DragScrollPayload, DragStartForm,
};
use crate::services::ServiceError;
use crate::services::persistence::{SharedRoster, lock_roster};

#[get("/v1/makler")]
pub async fn roster_state(roster: web::Data<SharedRoster>) -> impl Responder {
    match lock_roster(roster.get_ref()) {
        Ok(controller) => {
            HttpResponse::Ok().json(RosterView::from_controller(&controller, Utc::now()))
        }
        Err(err) => {
            log::error!("Failed to read the roster: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/makler/drag/start")]
pub async fn drag_start(
    roster: web::Data<SharedRoster>,
    web::Json(form): web::Json<DragStartForm>,
) -> impl Responder {
    let mut controller = match lock_roster(roster.get_ref()) {
        Ok(controller) => controller,
        Err(err) => {
            log::error!("Failed to read the roster: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match controller.begin_drag(form.index) {
        Ok(()) => HttpResponse::Ok().json(RosterView::from_controller(&controller, Utc::now())),
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(ApiError::new(message))
        }
        Err(err) => {
            log::error!("Failed to start dragging: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/makler/drag/over")]
pub async fn drag_over(
    roster: web::Data<SharedRoster>,
    web::Json(form): web::Json<DragOverForm>,
) -> impl Responder {
    let DragOverPayload {
        event,
        mut viewport,
    } = match DragOverPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return HttpResponse::BadRequest().json(ApiError::new(err.to_string())),
    };

    let mut controller = match lock_roster(roster.get_ref()) {
        Ok(controller) => controller,
        Err(err) => {
            log::error!("Failed to read the roster: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let outcome = controller.drag_over(event, &mut viewport);

    HttpResponse::Ok().json(DragOverResponse {
        roster: RosterView::from_controller(&controller, Utc::now()),
        moved: outcome.moved,
        scroll_top: viewport.scroll_top(),
        indicator: outcome.indicator,
    })
}

#[post("/v1/makler/drag/scroll")]
pub async fn drag_scroll(
    roster: web::Data<SharedRoster>,
    web::Json(form): web::Json<DragScrollForm>,
) -> impl Responder {
    let DragScrollPayload {
        pointer_y,
        mut viewport,
    } = match DragScrollPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return HttpResponse::BadRequest().json(ApiError::new(err.to_string())),
    };

    let scrolled = match lock_roster(roster.get_ref()) {
        Ok(mut controller) => controller.drag_scroll(pointer_y, &mut viewport).is_some(),
        Err(err) => {
            log::error!("Failed to read the roster: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(DragScrollResponse {
        scrolled,
        scroll_top: viewport.scroll_top(),
    })
}

#[post("/v1/makler/drag/end")]
pub async fn drag_end(roster: web::Data<SharedRoster>) -> impl Responder {
    match lock_roster(roster.get_ref()) {
        Ok(mut controller) => {
            controller.end_drag();
            HttpResponse::Ok().json(RosterView::from_controller(&controller, Utc::now()))
        }
        Err(err) => {
            log::error!("Failed to read the roster: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
