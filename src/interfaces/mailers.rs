pub mod email_sender;
pub mod resend;
