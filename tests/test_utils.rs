#![allow(dead_code)]

use actix_web::web;
use async_trait::async_trait;
use mockall::mock;
use portfolio_contact_backend::{
    entities::{
        contact::ContactForm,
        email_message::{EmailPayload, SentEmail},
    },
    errors::EmailError,
    mailers::email_sender::EmailSender,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    startup, AppState,
};
use reqwest::Client;
use std::{
    net::TcpListener,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

pub const OWNER_EMAIL: &str = "owner@example.com";

mock! {
    pub Mailer {}

    #[async_trait]
    impl EmailSender for Mailer {
        fn is_configured(&self) -> bool;
        async fn send(&self, email: &EmailPayload) -> Result<SentEmail, EmailError>;
    }
}

/// Mailer that is configured and accepts every message, counting sends.
pub fn accepting_mailer(sends: Arc<AtomicUsize>) -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(true);
    mailer.expect_send().returning(move |_| {
        let n = sends.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SentEmail { id: format!("email-{n}") })
    });
    mailer
}

pub fn test_config() -> AppConfig {
    AppConfig::for_testing(OWNER_EMAIL)
}

pub fn config_for(env: AppEnvironment) -> AppConfig {
    AppConfig {
        env,
        ..test_config()
    }
}

pub fn valid_form() -> ContactForm {
    ContactForm {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        subject: None,
        message: "I would love to collaborate on a project.".to_string(),
    }
}

pub fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "message": "I would love to collaborate on a project."
    })
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
}

impl TestApp {
    pub async fn spawn(mailer: MockMailer) -> Self {
        Self::spawn_with_config(mailer, test_config()).await
    }

    pub async fn spawn_with_config(mailer: MockMailer, config: AppConfig) -> Self {
        Self::spawn_with_routes(mailer, config, configure_routes).await
    }

    /// Runs the production middleware stack in front of a custom route table.
    pub async fn spawn_with_routes(
        mailer: MockMailer,
        config: AppConfig,
        routes: fn(&mut web::ServiceConfig),
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state = web::Data::new(AppState::with_mailer(&config, Arc::new(mailer)));

        let server = startup::run_with_routes(listener, state.clone(), &config, routes)
            .expect("Failed to bind server");
        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            config,
        }
    }

    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/contact", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to post contact form")
    }

    /// Sends a CORS preflight for `path`.
    pub async fn preflight(&self, path: &str, origin: &str, method: &str) -> reqwest::Response {
        self.client
            .request(reqwest::Method::OPTIONS, format!("{}{}", self.address, path))
            .header("Origin", origin)
            .header("Access-Control-Request-Method", method)
            .header("Access-Control-Request-Headers", "content-type")
            .send()
            .await
            .expect("Failed to send preflight request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to send GET request")
    }
}
