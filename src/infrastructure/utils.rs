pub mod email_template;
pub mod get_client_ip;
