use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::domain::{ManagedObject, ObjectKind};
use crate::ports::{ManagementSession, SessionResult};

use super::envelope::{self, MoRef};
use super::response::{self, ServiceContent};
use super::xml::Element;
use super::VimConfig;

/// API release announced in the SOAPAction header
const SOAP_ACTION: &str = "urn:vim25/6.5";

/// Management session on a vSphere Web Services endpoint (ESXi or vCenter)
pub struct VimSession {
    client: Client,
    url: Url,
    service: ServiceContent,
}

impl VimSession {
    /// Connect to `url` and authenticate; the session cookie lives in the client's cookie store
    pub async fn login(url: &Url, username: &str, password: &str, config: &VimConfig) -> SessionResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(!config.verify_tls)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        let response = Self::call(&client, url, envelope::retrieve_service_content()).await?;
        let service = response::service_content(&response)?;
        debug!("Service content: {:?}", service);

        let session = Self {
            client,
            url: url.clone(),
            service,
        };

        session
            .invoke(envelope::login(&session.service.session_manager, username, password))
            .await?;
        info!("Logged in to {} as {}", session.url, username);

        Ok(session)
    }

    async fn call(client: &Client, url: &Url, body: String) -> SessionResult<Element> {
        let response = client
            .post(url.clone())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let content = response.text().await?;
        response::parse_body(&content, status)
    }

    async fn invoke(&self, body: String) -> SessionResult<Element> {
        Self::call(&self.client, &self.url, body).await
    }

    async fn create_container_view(&self, kind: ObjectKind) -> SessionResult<MoRef> {
        let response = self
            .invoke(envelope::create_container_view(
                &self.service.view_manager,
                &self.service.root_folder,
                kind,
            ))
            .await?;
        response::container_view(&response)
    }

    async fn destroy_view(&self, view: &MoRef) -> SessionResult<()> {
        self.invoke(envelope::destroy_view(view)).await?;
        Ok(())
    }

    /// Page through the property collector until no continuation token is left
    async fn retrieve_all(
        &self,
        view: &MoRef,
        kind: ObjectKind,
        properties: &[&str],
    ) -> SessionResult<Vec<ManagedObject>> {
        let collector = &self.service.property_collector;

        let response = self
            .invoke(envelope::retrieve_properties(collector, view, kind, properties))
            .await?;
        let mut page = response::retrieve_result(&response)?;
        let mut objects = std::mem::take(&mut page.objects);

        while let Some(token) = page.token.take() {
            debug!("Continuing {} retrieval with token {}", kind, token);
            let response = self
                .invoke(envelope::continue_retrieve_properties(collector, &token))
                .await?;
            page = response::retrieve_result(&response)?;
            objects.append(&mut page.objects);
        }

        Ok(objects)
    }
}

#[async_trait]
impl ManagementSession for VimSession {
    async fn enumerate(&self, kind: ObjectKind, properties: &[&str]) -> SessionResult<Vec<ManagedObject>> {
        let view = self.create_container_view(kind).await?;
        debug!("Created container view {} for {}", view.value, kind);

        let result = self.retrieve_all(&view, kind, properties).await;

        // The view must go away on every path, including a failed retrieval
        if let Err(e) = self.destroy_view(&view).await {
            warn!("Failed to destroy container view {}: {}", view.value, e);
        }

        result
    }

    async fn logout(&self) -> SessionResult<()> {
        self.invoke(envelope::logout(&self.service.session_manager))
            .await?;
        debug!("Logged out of {}", self.url);
        Ok(())
    }
}
