//! Implements the `Sheet` trait for a Google sheet. The spreadsheet is found by its title using
//! the Drive API, rows are read with the `sheets::Client` and appended with the Sheets REST API.

use crate::api::{Cell, Sheet, TokenProvider};
use crate::error::Res;
use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use sheets::types::{DateTimeRenderOption, Dimension, ValueRenderOption};
use sheets::ClientError;
use tracing::{debug, trace};

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Implements the `Sheet` trait against the first tab of a Google spreadsheet. It takes a
/// `TokenProvider`, from which it gets a fresh token before each call.
pub(crate) struct GoogleSheet {
    token_provider: TokenProvider,
    client: sheets::Client,
    http: reqwest::Client,
    spreadsheet_id: String,
    tab: String,
}

impl GoogleSheet {
    /// Finds the spreadsheet titled `title` among the files shared with the service account and
    /// binds to its first tab.
    pub(crate) async fn open(title: &str, mut token_provider: TokenProvider) -> Res<Self> {
        let http = reqwest::Client::new();
        let token = token_provider.token_with_refresh().await?;
        let spreadsheet_id = find_spreadsheet(&http, &token, title).await?;
        let tab = first_tab(&http, &token, &spreadsheet_id).await?;
        debug!(
            "Opened spreadsheet '{title}' ({spreadsheet_id}) as {}, using tab '{tab}'",
            token_provider.client_email()
        );
        let client = create_sheets_client(&token);
        Ok(Self {
            token_provider,
            client,
            http,
            spreadsheet_id,
            tab,
        })
    }

    /// Refreshes the sheets client with a new access token if needed
    async fn refresh_client(&mut self) -> Res<String> {
        let token = self.token_provider.token_with_refresh().await?;
        self.client = create_sheets_client(&token);
        Ok(token)
    }

    /// A1 notation for `cells` on the bound tab, e.g. `'Sheet 1'!A:ZZ`.
    fn range(&self, cells: &str) -> String {
        format!("'{}'!{cells}", self.tab.replace('\'', "''"))
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    async fn get(&mut self) -> Res<Vec<Vec<String>>> {
        self.refresh_client().await?;
        let range = self.range("A:ZZ");
        trace!("get {range}");
        let response = self
            .client
            .spreadsheets()
            .values_get(
                &self.spreadsheet_id,
                &range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to fetch the rows of '{}'", self.tab))?;
        Ok(response.body.values)
    }

    async fn append(&mut self, row: &[Cell]) -> Res<()> {
        let token = self.refresh_client().await?;
        let range = self.range("A1");
        trace!("append {row:?} to {range}");

        let mut url = reqwest::Url::parse(SHEETS_URL).context("Invalid Sheets API URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("The Sheets API URL cannot have path segments"))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{range}:append"));

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&serde_json::json!({
                "majorDimension": "ROWS",
                "values": [row],
            }))
            .send()
            .await
            .context("Failed to send the append request to the Google Sheets API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("Google Sheets API append failed with status {status}: {body}");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

/// Looks up the ID of the spreadsheet named `title`. When more than one spreadsheet has that name
/// the first one the Drive API returns is used.
async fn find_spreadsheet(http: &reqwest::Client, token: &str, title: &str) -> Res<String> {
    let query = format!(
        "name = '{}' and mimeType = '{SPREADSHEET_MIME_TYPE}' and trashed = false",
        title.replace('\\', "\\\\").replace('\'', "\\'")
    );
    let response = http
        .get(DRIVE_FILES_URL)
        .bearer_auth(token)
        .query(&[
            ("q", query.as_str()),
            ("fields", "files(id,name)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ])
        .send()
        .await
        .context("Failed to send the file search request to the Google Drive API")?;
    let list: DriveFileList = parse_response(response, "Google Drive API file search").await?;
    match list.files.into_iter().next() {
        Some(file) => Ok(file.id),
        None => bail!("No spreadsheet named '{title}' was found"),
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<TabMeta>,
}

#[derive(Debug, Deserialize)]
struct TabMeta {
    properties: TabProperties,
}

#[derive(Debug, Deserialize)]
struct TabProperties {
    title: String,
    #[serde(default)]
    index: u32,
}

/// Returns the title of the first tab of the spreadsheet.
async fn first_tab(http: &reqwest::Client, token: &str, spreadsheet_id: &str) -> Res<String> {
    let response = http
        .get(format!("{SHEETS_URL}/{spreadsheet_id}"))
        .bearer_auth(token)
        .query(&[("fields", "sheets.properties(title,index)")])
        .send()
        .await
        .context("Failed to send the spreadsheet request to the Google Sheets API")?;
    let meta: SpreadsheetMeta = parse_response(response, "Google Sheets API spreadsheet get").await?;
    meta.sheets
        .into_iter()
        .min_by_key(|tab| tab.properties.index)
        .map(|tab| tab.properties.title)
        .context("The spreadsheet has no tabs")
}

/// Fails with the response body if the status is not a success, otherwise parses the JSON body.
async fn parse_response<T>(response: reqwest::Response, what: &str) -> Res<T>
where
    T: serde::de::DeserializeOwned,
{
    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        bail!("{what} failed with status {status}: {body}");
    }
    response
        .json()
        .await
        .with_context(|| format!("Failed to parse the {what} response"))
}

/// Creates a sheets client that uses `access_token`.
fn create_sheets_client(access_token: &str) -> sheets::Client {
    // Note: The sheets crate requires client_id, client_secret, and redirect_uri,
    // but we don't need them for API calls, only the access token
    sheets::Client::new(
        String::new(), // client_id
        String::new(), // client_secret
        String::new(), // redirect_uri
        access_token.to_string(),
        String::new(), // refresh_token (service accounts have none, we sign a new grant instead)
    )
}

fn map_client_error(e: ClientError) -> anyhow::Error {
    let error_name = match &e {
        ClientError::EmptyRefreshToken => "EmptyRefreshToken".to_string(),
        ClientError::FromUtf8Error(inner) => format!("FromUtf8Error {inner}"),
        ClientError::UrlParserError(inner) => format!("UrlParserError {inner}"),
        ClientError::SerdeJsonError(inner) => format!("SerdeJsonError {inner}"),
        ClientError::ReqwestError(inner) => format!("ReqwestError {inner}"),
        ClientError::InvalidHeaderValue(inner) => format!("InvalidHeaderValue {inner}"),
        ClientError::ReqwestMiddleWareError(inner) => format!("ReqwestMiddleWareError {inner}"),
        ClientError::HttpError { .. } => "HttpError".to_string(),
        ClientError::Other(_) => "Other".to_string(),
    };
    anyhow::Error::new(e).context(error_name)
}
