//! Google Sheets Store
//!
//! Talks to the Sheets v4 REST API with a caller-supplied OAuth bearer token.
//! Minting the token (service account, user consent) happens outside this
//! crate; see `SurveyConfig::access_token`.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{SheetFormat, Table, TableStore, WriteOptions, WriteOutcome};
use crate::error::{SurveyError, SurveyResult};

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Value>,
}

/// Extract the document id from a spreadsheet URL, or accept a bare id.
pub fn spreadsheet_id_from_url(url: &str) -> SurveyResult<String> {
    let url_re = Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)")
        .map_err(|e| SurveyError::Configuration(e.to_string()))?;
    if let Some(id) = url_re.captures(url).and_then(|c| c.get(1)) {
        return Ok(id.as_str().to_string());
    }

    let bare_re = Regex::new(r"^[a-zA-Z0-9_-]{20,}$")
        .map_err(|e| SurveyError::Configuration(e.to_string()))?;
    if bare_re.is_match(url.trim()) {
        return Ok(url.trim().to_string());
    }

    Err(SurveyError::Configuration(format!(
        "cannot find a spreadsheet id in '{}'",
        url
    )))
}

/// A1 range covering a whole worksheet, quoted for the API
pub fn worksheet_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

/// `batchUpdate` requests for the cosmetic formatting pass
pub fn format_requests(sheet_id: i64, format: &SheetFormat) -> Vec<Value> {
    let mut header_format = json!({
        "horizontalAlignment": "CENTER",
        "verticalAlignment": "MIDDLE",
    });
    if format.bold_header {
        header_format["textFormat"] = json!({ "bold": true });
    }

    vec![
        json!({
            "updateSheetProperties": {
                "properties": {
                    "sheetId": sheet_id,
                    "gridProperties": {
                        "frozenRowCount": format.frozen_rows,
                        "frozenColumnCount": format.frozen_columns,
                    }
                },
                "fields": "gridProperties.frozenRowCount,gridProperties.frozenColumnCount"
            }
        }),
        json!({
            "repeatCell": {
                "range": { "sheetId": sheet_id, "startRowIndex": 0, "endRowIndex": 1 },
                "cell": { "userEnteredFormat": header_format },
                "fields": "userEnteredFormat(horizontalAlignment,verticalAlignment,textFormat)"
            }
        }),
        json!({
            "repeatCell": {
                "range": {
                    "sheetId": sheet_id,
                    "startRowIndex": 1,
                    "startColumnIndex": format.centered_from_column,
                    "endColumnIndex": format.centered_to_column,
                },
                "cell": {
                    "userEnteredFormat": {
                        "horizontalAlignment": "CENTER",
                        "verticalAlignment": "MIDDLE",
                    }
                },
                "fields": "userEnteredFormat(horizontalAlignment,verticalAlignment)"
            }
        }),
        json!({
            "updateDimensionProperties": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "COLUMNS",
                    "startIndex": 0,
                    "endIndex": 1,
                },
                "properties": { "pixelSize": format.first_column_width },
                "fields": "pixelSize"
            }
        }),
    ]
}

/// Table store backed by one Google spreadsheet document
pub struct SheetsStore {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsStore {
    pub fn new(spreadsheet_url: &str, access_token: impl Into<String>) -> SurveyResult<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(SurveyError::Configuration(
                "an OAuth access token is required for the sheets backend".to_string(),
            ));
        }

        Ok(Self {
            client: Client::builder()
                .user_agent("gradability_survey/0.2.0")
                .build()
                .unwrap_or_default(),
            api_base: DEFAULT_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id_from_url(spreadsheet_url)?,
            access_token,
        })
    }

    /// Point the store at a different API root (proxies, local fakes)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn document_url(&self) -> String {
        format!("{}/{}", self.api_base, self.spreadsheet_id)
    }

    fn values_url(&self, worksheet: &str) -> String {
        format!(
            "{}/values/{}",
            self.document_url(),
            urlencoding::encode(&worksheet_range(worksheet))
        )
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> SurveyResult<Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| SurveyError::DataAccess(format!("{} failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SurveyError::DataAccess(format!(
                "{} returned {}: {}",
                what,
                status,
                body.trim()
            )));
        }
        Ok(response)
    }

    async fn sheet_properties(&self) -> SurveyResult<Vec<SheetProperties>> {
        let request = self
            .client
            .get(self.document_url())
            .query(&[("fields", "sheets.properties")]);
        let meta: SpreadsheetMeta = self.send(request, "spreadsheet metadata").await?.json().await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties).collect())
    }

    async fn batch_update(&self, requests: Vec<Value>) -> SurveyResult<BatchUpdateResponse> {
        let request = self
            .client
            .post(format!("{}:batchUpdate", self.document_url()))
            .json(&json!({ "requests": requests }));
        Ok(self.send(request, "batchUpdate").await?.json().await?)
    }

    async fn add_sheet(&self, worksheet: &str, rows: usize, cols: usize) -> SurveyResult<i64> {
        let reply = self
            .batch_update(vec![json!({
                "addSheet": {
                    "properties": {
                        "title": worksheet,
                        "gridProperties": {
                            "rowCount": rows.max(1),
                            "columnCount": cols.max(1),
                        }
                    }
                }
            })])
            .await?;

        reply
            .replies
            .first()
            .and_then(|r| r["addSheet"]["properties"]["sheetId"].as_i64())
            .ok_or_else(|| SurveyError::DataAccess(format!("addSheet for '{}' returned no sheetId", worksheet)))
    }

    async fn clear(&self, worksheet: &str) -> SurveyResult<()> {
        let request = self
            .client
            .post(format!("{}:clear", self.values_url(worksheet)))
            .json(&json!({}));
        self.send(request, "values.clear").await?;
        Ok(())
    }

    async fn update_values(&self, worksheet: &str, table: &Table) -> SurveyResult<()> {
        let request = self
            .client
            .put(self.values_url(worksheet))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({
                "range": worksheet_range(worksheet),
                "majorDimension": "ROWS",
                "values": table.to_values(),
            }));
        self.send(request, "values.update").await?;
        Ok(())
    }
}

#[async_trait]
impl TableStore for SheetsStore {
    fn name(&self) -> &str {
        "sheets"
    }

    async fn read(&self, worksheet: &str) -> SurveyResult<Table> {
        debug!("reading worksheet '{}' from {}", worksheet, self.spreadsheet_id);
        let request = self
            .client
            .get(self.values_url(worksheet))
            .query(&[("majorDimension", "ROWS"), ("valueRenderOption", "FORMATTED_VALUE")]);
        let range: ValueRange = self
            .send(request, &format!("reading worksheet '{}'", worksheet))
            .await?
            .json()
            .await?;
        Ok(Table::from_values(&range.values))
    }

    async fn write(
        &self,
        worksheet: &str,
        table: &Table,
        options: &WriteOptions,
    ) -> SurveyResult<WriteOutcome> {
        let existing = self
            .sheet_properties()
            .await?
            .into_iter()
            .find(|p| p.title == worksheet);

        let (sheet_id, outcome) = match existing {
            Some(props) => {
                self.clear(worksheet).await?;
                (props.sheet_id, WriteOutcome::Replaced)
            }
            None => {
                let id = self.add_sheet(worksheet, table.len() + 1, table.width()).await?;
                (id, WriteOutcome::Created)
            }
        };

        self.update_values(worksheet, table).await?;

        if let Some(format) = &options.format {
            self.batch_update(format_requests(sheet_id, format)).await?;
        }

        info!(
            "{:?} worksheet '{}' in spreadsheet {} ({} rows)",
            outcome,
            worksheet,
            self.spreadsheet_id,
            table.len()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str =
        "https://docs.google.com/spreadsheets/d/1jxXRnLCp8mHE2MvJ5C8CwXuzFEj36_2tT0MFAaCtBp4/edit#gid=0";

    #[test]
    fn test_spreadsheet_id_from_url() {
        assert_eq!(
            spreadsheet_id_from_url(URL).unwrap(),
            "1jxXRnLCp8mHE2MvJ5C8CwXuzFEj36_2tT0MFAaCtBp4"
        );
        assert_eq!(
            spreadsheet_id_from_url("1jxXRnLCp8mHE2MvJ5C8CwXuzFEj36_2tT0MFAaCtBp4").unwrap(),
            "1jxXRnLCp8mHE2MvJ5C8CwXuzFEj36_2tT0MFAaCtBp4"
        );
        assert!(spreadsheet_id_from_url("not a sheet").is_err());
    }

    #[test]
    fn test_worksheet_range_quotes_titles() {
        assert_eq!(worksheet_range("Word Order Preference"), "'Word Order Preference'");
        assert_eq!(worksheet_range("Mary's"), "'Mary''s'");
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let err = SheetsStore::new(URL, "  ").err().unwrap();
        assert!(matches!(err, SurveyError::Configuration(_)));
    }

    #[test]
    fn test_values_url_encodes_range() {
        let store = SheetsStore::new(URL, "token")
            .unwrap()
            .with_api_base("http://localhost:9000/v4/spreadsheets/");
        assert_eq!(
            store.values_url("Faultless Disagreement"),
            "http://localhost:9000/v4/spreadsheets/1jxXRnLCp8mHE2MvJ5C8CwXuzFEj36_2tT0MFAaCtBp4/values/%27Faultless%20Disagreement%27"
        );
    }

    #[test]
    fn test_format_requests_follow_sheet_format() {
        let requests = format_requests(42, &SheetFormat::default());
        assert_eq!(requests.len(), 4);
        let frozen = &requests[0]["updateSheetProperties"]["properties"];
        assert_eq!(frozen["sheetId"], 42);
        assert_eq!(frozen["gridProperties"]["frozenRowCount"], 1);
        assert_eq!(
            requests[1]["repeatCell"]["cell"]["userEnteredFormat"]["textFormat"]["bold"],
            true
        );
        assert_eq!(requests[2]["repeatCell"]["range"]["startColumnIndex"], 5);
        assert_eq!(requests[3]["updateDimensionProperties"]["properties"]["pixelSize"], 25);
    }
}
