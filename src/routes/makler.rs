use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::{Context, Tera};

use crate::dto::roster::RosterView;
use crate::repository::HttpRosterRepository;
use crate::routes::{collect_alerts, redirect, render_template};
use crate::services::ServiceError;
use crate::services::persistence::{SharedRoster, load_roster, lock_roster, save_roster};

#[get("/makler")]
pub async fn show_makler(
    roster: web::Data<SharedRoster>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let view = match lock_roster(roster.get_ref()) {
        Ok(controller) => RosterView::from_controller(&controller, Utc::now()),
        Err(err) => {
            log::error!("Failed to read the roster: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = Context::new();
    context.insert("alerts", &collect_alerts(&flash_messages));
    context.insert("current_page", "makler");
    context.insert("roster", &view);

    render_template(&tera, "makler/index.html", &context)
}

#[post("/makler/load")]
pub async fn load_makler(
    roster: web::Data<SharedRoster>,
    repo: web::Data<HttpRosterRepository>,
) -> impl Responder {
    match load_roster(repo.get_ref(), roster.get_ref()).await {
        Ok(count) => {
            FlashMessage::info(format!("Загружено маклеров: {count}.")).send();
        }
        Err(ServiceError::AuthMissing) => {
            FlashMessage::error("Требуется вход в систему.").send();
        }
        Err(err) => {
            log::error!("Failed to load the roster: {err}");
            FlashMessage::error("Не удалось загрузить список маклеров.").send();
        }
    }
    redirect("/makler")
}

#[post("/makler/save")]
pub async fn save_makler(
    roster: web::Data<SharedRoster>,
    repo: web::Data<HttpRosterRepository>,
) -> impl Responder {
    match save_roster(repo.get_ref(), roster.get_ref()).await {
        Ok(None) => {
            FlashMessage::info("Нет изменений для сохранения.").send();
        }
        Ok(Some(outcome)) => match outcome.refresh_error {
            None => FlashMessage::success("Позиции сохранены.").send(),
            Some(_) => FlashMessage::warning(
                "Позиции сохранены, но список не удалось обновить. Обновите страницу.",
            )
            .send(),
        },
        Err(ServiceError::AuthMissing) => {
            FlashMessage::error("Требуется вход в систему.").send();
        }
        Err(ServiceError::Busy) => {
            FlashMessage::warning("Сохранение уже выполняется.").send();
        }
        Err(ServiceError::SaveValidation(detail)) => {
            FlashMessage::error(format!("Сервер отклонил позиции: {detail}")).send();
        }
        Err(err) => {
            log::error!("Failed to save positions: {err}");
            FlashMessage::error("Ошибка при сохранении позиций.").send();
        }
    }
    redirect("/makler")
}
