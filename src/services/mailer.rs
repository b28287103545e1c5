//! SMTP delivery for DPR emails.
//!
//! Uses lettre over STARTTLS. The transport is built once from
//! configuration and cloned per send; lettre transports are cheap handles.

use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// SMTP client wrapper.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl Mailer {
    /// Build a mailer from SMTP configuration. Fails when the configuration
    /// is incomplete or the sender address does not parse.
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        if !config.is_complete() {
            return Err(AppError::Mail(
                "SMTP configuration is incomplete: set SMTP_USERNAME, SMTP_PASSWORD and SENDER_EMAIL"
                    .to_string(),
            ));
        }

        let sender: Mailbox = format!("{} <{}>", config.sender_name, config.sender_email)
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid sender address: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Mail(format!("Failed to build SMTP transport: {}", e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, sender })
    }

    /// Send one DPR email with the workbook attached.
    pub async fn send_dpr(
        &self,
        recipient_email: &str,
        subject: &str,
        body_html: String,
        attachment_name: &str,
        attachment: Vec<u8>,
    ) -> AppResult<()> {
        let to: Mailbox = recipient_email
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid recipient address: {}", e)))?;

        let xlsx_type = ContentType::parse(XLSX_MIME)
            .map_err(|e| AppError::Mail(format!("Invalid attachment content type: {}", e)))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(body_html),
                    )
                    .singlepart(
                        Attachment::new(attachment_name.to_string()).body(attachment, xlsx_type),
                    ),
            )
            .map_err(|e| AppError::Mail(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}

/// Subject line for a daily DPR email.
pub fn dpr_subject(report_date: NaiveDate) -> String {
    format!(
        "MAHSR-T3 Daily Progress Report - {}",
        report_date.format("%d-%m-%Y")
    )
}

/// HTML body for a daily DPR email.
pub fn dpr_body_html(report_date: NaiveDate, sites: &[String], total_reports: usize) -> String {
    let date_str = report_date.format("%d-%m-%Y").to_string();
    let sites_list = sites.join(", ");

    format!(
        r#"<html>
<head>
<style>
  body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
  .header {{ background-color: #4472C4; color: white; padding: 20px; text-align: center; }}
  .content {{ padding: 20px; background-color: #f5f5f5; }}
  .info-box {{ background-color: white; border-left: 4px solid #4472C4; padding: 15px; margin: 15px 0; }}
  .footer {{ padding: 15px; text-align: center; font-size: 12px; color: #666; }}
  table {{ width: 100%; border-collapse: collapse; margin: 10px 0; }}
  th, td {{ padding: 10px; text-align: left; border-bottom: 1px solid #ddd; }}
  th {{ background-color: #4472C4; color: white; }}
</style>
</head>
<body>
  <div class="header">
    <h1>MAHSR-T3 Daily Progress Report</h1>
    <p>Mumbai-Ahmedabad High Speed Rail Project</p>
  </div>
  <div class="content">
    <p>Dear Project Manager,</p>
    <p>Please find attached the Daily Progress Report (DPR) for <strong>{date_str}</strong>.</p>
    <div class="info-box">
      <h3>Report Summary</h3>
      <table>
        <tr><th>Report Date</th><td>{date_str}</td></tr>
        <tr><th>Sites Covered</th><td>{sites_list}</td></tr>
        <tr><th>Total Reports</th><td>{total_reports}</td></tr>
      </table>
    </div>
    <p>For any queries or clarifications, please contact the project team.</p>
    <p>Best Regards,<br><strong>MAHSR-T3 DPR System</strong><br>Automated Report Generation</p>
  </div>
  <div class="footer">
    <p>This is an automated email. Please do not reply to this message.</p>
  </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_dpr_subject_carries_formatted_date() {
        assert_eq!(
            dpr_subject(date("2025-05-28")),
            "MAHSR-T3 Daily Progress Report - 28-05-2025"
        );
    }

    #[test]
    fn test_dpr_body_lists_sites_and_count() {
        let body = dpr_body_html(
            date("2025-05-28"),
            &["TCB-401".to_string(), "TCB-402".to_string()],
            7,
        );
        assert!(body.contains("28-05-2025"));
        assert!(body.contains("TCB-401, TCB-402"));
        assert!(body.contains("<td>7</td>"));
    }

    #[test]
    fn test_mailer_rejects_incomplete_config() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            sender_email: String::new(),
            sender_name: "DPR".to_string(),
        };
        assert!(Mailer::new(&config).is_err());
    }
}
