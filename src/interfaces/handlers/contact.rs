use actix_web::{web, Either, HttpResponse, Responder};

use crate::{entities::contact::ContactForm, AppState};

/// Accepts the form as JSON or as `application/x-www-form-urlencoded`.
pub async fn submit_contact(
    state: web::Data<AppState>,
    form: Either<web::Json<ContactForm>, web::Form<ContactForm>>,
) -> impl Responder {
    let form = match form {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    match state.contact_handler.submit(form).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_http_response(),
    }
}
