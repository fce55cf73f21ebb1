use tracing::{debug, instrument};

use crate::account::validate_email;
use crate::client::UptimeRobotClient;
use crate::dialect::Operation;
use crate::errors::{Result, UptimeRobotError, ValidationError};
use crate::params::{is_blank, NewAlertContact};
use crate::types::{is_main_alert_contact, AlertContact, AlertContactType};

impl UptimeRobotClient {
    /// List every alert contact on the account
    #[instrument(name = "UptimeRobotClient::list_alert_contacts", skip_all)]
    pub async fn list_alert_contacts(&self) -> Result<Vec<AlertContact>> {
        self.get_alert_contacts(&[]).await
    }

    /// Fetch the alert contacts with the given ids; an empty slice fetches all
    #[instrument(
        name = "UptimeRobotClient::get_alert_contacts",
        skip_all,
        fields(alert_contact_ids = ids.len())
    )]
    pub async fn get_alert_contacts(&self, ids: &[String]) -> Result<Vec<AlertContact>> {
        let version = self.api_version();
        let body = self
            .call(Operation::GetAlertContacts, version.alert_contact_query_params(ids))
            .await?;

        let contacts = version.decode_alert_contacts(&body)?;
        debug!(alert_contact_count = contacts.len(), "Fetched alert contacts");
        Ok(contacts)
    }

    #[instrument(
        name = "UptimeRobotClient::get_alert_contact",
        skip_all,
        fields(alert_contact_id = id)
    )]
    pub async fn get_alert_contact(&self, id: &str) -> Result<Option<AlertContact>> {
        let contacts = self.get_alert_contacts(&[id.to_string()]).await?;
        Ok(contacts.into_iter().find(|contact| contact.id == id))
    }

    /// Create an alert contact and return its id
    ///
    /// # Errors
    ///
    /// Returns a validation error, without contacting UptimeRobot, if:
    /// - The value is empty
    /// - An e-mail contact has a malformed address
    /// - The contact type cannot be created through the configured API version
    ///   (SMS and Twitter never can, web hooks only through v2)
    #[instrument(
        name = "UptimeRobotClient::add_alert_contact",
        skip_all,
        fields(contact_type = %contact.contact_type)
    )]
    pub async fn add_alert_contact(&self, contact: &NewAlertContact) -> Result<String> {
        let version = self.api_version();

        if is_blank(Some(contact.value.as_str())) {
            return Err(ValidationError::MissingField("value").into());
        }
        version.check_alert_contact_type(contact.contact_type)?;
        if contact.contact_type == AlertContactType::Email {
            validate_email(&contact.value)?;
        }

        let body = self
            .call(Operation::NewAlertContact, version.new_alert_contact_params(contact))
            .await?;

        let id = version.decode_created_alert_contact(&body)?.ok_or_else(|| {
            UptimeRobotError::UnexpectedResponse(
                "newAlertContact returned no alert contact id".to_string(),
            )
        })?;

        debug!(alert_contact_id = %id, "Alert contact created");
        Ok(id)
    }

    /// Delete an alert contact
    ///
    /// The account's main contact (id starting with `0`) is refused locally.
    #[instrument(
        name = "UptimeRobotClient::delete_alert_contact",
        skip_all,
        fields(alert_contact_id = id)
    )]
    pub async fn delete_alert_contact(&self, id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(ValidationError::MissingField("id").into());
        }
        if is_main_alert_contact(id) {
            return Err(ValidationError::MainAlertContact(id.to_string()).into());
        }

        let version = self.api_version();
        self.call(
            Operation::DeleteAlertContact,
            version.delete_alert_contact_params(id),
        )
        .await?;

        debug!("Alert contact deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::ApiVersion;
    use crate::types::AlertContactStatus;
    use url::Url;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(mock_server: &MockServer, version: ApiVersion) -> UptimeRobotClient {
        UptimeRobotClient::builder("test-key")
            .api_version(version)
            .api_url(Url::parse(&mock_server.uri()).unwrap())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_alert_contacts_legacy_single_item() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getAlertContacts"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"stat": "ok", "alertcontacts": {"alertcontact": {"id": "0526", "value": "ops@example.com", "type": "2", "status": "2"}}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, ApiVersion::Legacy);
        let contacts = client.list_alert_contacts().await.unwrap();

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, "0526");
        assert_eq!(contacts[0].contact_type, AlertContactType::Email);
        assert_eq!(contacts[0].status, Some(AlertContactStatus::Active));
    }

    #[tokio::test]
    async fn test_list_alert_contacts_legacy_none_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getAlertContacts"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"stat": "fail", "id": "221", "message": "The account has no alert contacts"}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, ApiVersion::Legacy);
        assert!(client.list_alert_contacts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_alert_contact_v2() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/getAlertContacts"))
            .and(body_string_contains("alert_contacts=2014599"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"stat": "ok", "alert_contacts": [{"id": "2014599", "friendly_name": "Hook", "type": 5, "status": 2, "value": "https://hooks.example.com/?"}]}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, ApiVersion::V2);
        let contact = client.get_alert_contact("2014599").await.unwrap().unwrap();

        assert_eq!(contact.contact_type, AlertContactType::WebHook);
        assert_eq!(contact.friendly_name.as_deref(), Some("Hook"));
        assert!(!contact.is_main());
    }

    #[tokio::test]
    async fn test_add_alert_contact_legacy() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/newAlertContact"))
            .and(query_param("alertContactType", "2"))
            .and(query_param("alertContactValue", "example@ceecore.com"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"stat": "ok", "alertcontact": {"id": "4561", "status": "0"}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, ApiVersion::Legacy);
        let id = client
            .add_alert_contact(&NewAlertContact::email("example@ceecore.com"))
            .await
            .unwrap();
        assert_eq!(id, "4561");
    }

    #[tokio::test]
    async fn test_add_alert_contact_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/newAlertContact"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"stat": "fail", "error": {"type": "already_exists", "message": "alert contact already exists."}}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, ApiVersion::V2);
        let err = client
            .add_alert_contact(&NewAlertContact::email("example@ceecore.com"))
            .await
            .unwrap_err();

        assert_eq!(err.api_code(), Some("already_exists"));
        assert_eq!(
            err.to_string(),
            "UptimeRobot API error: alert contact already exists. (code: already_exists)"
        );
    }

    #[tokio::test]
    async fn test_add_alert_contact_rejected_locally() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, ApiVersion::Legacy);

        let result = client
            .add_alert_contact(&NewAlertContact::new(AlertContactType::Sms, "+4369912345678"))
            .await;
        assert!(matches!(
            result,
            Err(UptimeRobotError::Validation(
                ValidationError::UnsupportedAlertContactType(AlertContactType::Sms)
            ))
        ));

        let result = client
            .add_alert_contact(&NewAlertContact::web_hook("https://hooks.example.com/?"))
            .await;
        assert!(matches!(
            result,
            Err(UptimeRobotError::Validation(
                ValidationError::UnsupportedAlertContactType(AlertContactType::WebHook)
            ))
        ));

        let result = client
            .add_alert_contact(&NewAlertContact::email("not-an-address"))
            .await;
        assert!(matches!(
            result,
            Err(UptimeRobotError::Validation(ValidationError::InvalidEmail(_)))
        ));

        let result = client.add_alert_contact(&NewAlertContact::email("")).await;
        assert!(matches!(
            result,
            Err(UptimeRobotError::Validation(ValidationError::MissingField("value")))
        ));
    }

    #[tokio::test]
    async fn test_delete_main_alert_contact_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, ApiVersion::Legacy);
        let result = client.delete_alert_contact("0526").await;

        assert!(matches!(
            result,
            Err(UptimeRobotError::Validation(ValidationError::MainAlertContact(ref id))) if id == "0526"
        ));
    }

    #[tokio::test]
    async fn test_delete_alert_contact() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/deleteAlertContact"))
            .and(body_string_contains("id=4561"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"stat": "ok", "alert_contact": {"id": "4561"}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, ApiVersion::V2);
        assert!(client.delete_alert_contact("4561").await.is_ok());
    }
}
