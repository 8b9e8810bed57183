use ammonia::clean_text;
use chrono::{DateTime, Utc};

use crate::entities::contact::ContactSubmission;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
}

/// Renders the notification sent to the site owner for one submission.
///
/// Every user-supplied value is escaped before it lands in the HTML body.
pub fn render_contact_email(
    submission: &ContactSubmission,
    source_label: &str,
    received_at: DateTime<Utc>,
) -> RenderedEmail {
    RenderedEmail {
        html: render_html(submission, source_label, received_at),
        text: render_text(submission, source_label, received_at),
    }
}

fn render_html(submission: &ContactSubmission, source_label: &str, received_at: DateTime<Utc>) -> String {
    let name = clean_text(&submission.name);
    let email = clean_text(&submission.email);
    let message = clean_text(&submission.message);
    let source = clean_text(source_label);
    let received = received_at.format("%A, %B %-d, %Y at %-I:%M %p UTC");

    let subject_row = submission
        .subject
        .as_deref()
        .map(|subject| {
            format!(
                r#"<tr>
                  <td style="padding: 12px; font-weight: bold; color: #666; vertical-align: top;">📋 Subject:</td>
                  <td style="padding: 12px; color: #333;">{}</td>
                </tr>"#,
                clean_text(subject)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>New Contact Form Message</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 30px; border-radius: 10px 10px 0 0; text-align: center;">
    <h1 style="color: white; margin: 0; font-size: 24px;">📬 New Contact Form Message</h1>
  </div>
  <div style="background: #f8f9fa; padding: 30px; border-radius: 0 0 10px 10px;">
    <div style="background: white; padding: 25px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
      <h2 style="color: #667eea; margin-top: 0; font-size: 20px; border-bottom: 2px solid #667eea; padding-bottom: 10px;">Sender Information</h2>
      <table style="width: 100%; border-collapse: collapse; margin: 20px 0;">
        <tr>
          <td style="padding: 12px; font-weight: bold; color: #666; width: 120px; vertical-align: top;">👤 Name:</td>
          <td style="padding: 12px; color: #333;">{name}</td>
        </tr>
        <tr style="background: #f8f9fa;">
          <td style="padding: 12px; font-weight: bold; color: #666; vertical-align: top;">📧 Email:</td>
          <td style="padding: 12px; color: #333;"><a href="mailto:{email}" style="color: #667eea; text-decoration: none;">{email}</a></td>
        </tr>
        {subject_row}
      </table>
      <h2 style="color: #667eea; font-size: 18px; border-bottom: 2px solid #667eea; padding-bottom: 10px; margin-top: 30px;">💬 Message</h2>
      <div style="background: #f8f9fa; padding: 20px; border-radius: 6px; margin: 15px 0; border-left: 4px solid #667eea;">
        <p style="margin: 0; white-space: pre-wrap; color: #333; line-height: 1.8;">{message}</p>
      </div>
      <div style="margin-top: 30px; padding: 20px; background: #e7f3ff; border-radius: 6px; border-left: 4px solid #2196F3;">
        <p style="margin: 0; color: #1976D2; font-size: 14px;">
          <strong>💡 Quick Reply:</strong> Simply hit reply to respond directly to {name} at {email}
        </p>
      </div>
    </div>
    <div style="text-align: center; margin-top: 20px; padding-top: 20px; border-top: 1px solid #dee2e6; color: #6c757d; font-size: 12px;">
      <p style="margin: 5px 0;">📅 Received: {received}</p>
      <p style="margin: 5px 0;">🌐 Source: {source}</p>
    </div>
  </div>
</body>
</html>
"#
    )
}

fn render_text(submission: &ContactSubmission, source_label: &str, received_at: DateTime<Utc>) -> String {
    let subject_line = submission
        .subject
        .as_deref()
        .map(|subject| format!("Subject: {subject}\n"))
        .unwrap_or_default();

    format!(
        "NEW CONTACT FORM MESSAGE\n\
         ========================\n\
         \n\
         From: {name}\n\
         Email: {email}\n\
         {subject_line}\
         \n\
         MESSAGE:\n\
         --------\n\
         {message}\n\
         \n\
         ---\n\
         Received: {received}\n\
         Source: {source_label}\n\
         \n\
         Reply directly to this email to respond to {name}.\n",
        name = submission.name,
        email = submission.email,
        message = submission.message,
        received = received_at.format("%m/%d/%Y, %-I:%M:%S %p UTC"),
    )
}
