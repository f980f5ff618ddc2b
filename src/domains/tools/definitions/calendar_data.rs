//! Calendar listing tool definition.
//!
//! Lists the meetings on a given date (today when omitted).

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::common::{error_result, json_result, parse_arguments};
use crate::domains::calendar::{CalendarService, MeetingSummary};
use crate::domains::tools::ToolError;

const INVALID_DATE: &str = "Invalid date format. Please provide a valid date string.";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the calendar listing tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetCalendarDataParams {
    /// Day to list.
    #[schemars(description = "Date in YYYY-MM-DD format. Defaults to today.")]
    #[serde(default)]
    pub date: Option<String>,
}

/// Structured output for a date listing.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDataResult {
    pub date: String,
    pub meetings: Vec<MeetingSummary>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Calendar listing tool - returns the meetings on one day.
pub struct GetCalendarDataTool;

impl GetCalendarDataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getMyCalendarDataByDate";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the meetings on my calendar for a given date. Returns up to 10 events ordered by start time, each with its title and start. The date defaults to today.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(date = ?params.date))]
    pub async fn execute(params: &GetCalendarDataParams, calendar: &CalendarService) -> CallToolResult {
        let date = match params.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            None => Local::now().date_naive(),
            Some(raw) => match parse_date(raw) {
                Some(date) => date,
                None => return error_result(INVALID_DATE),
            },
        };
        info!("Calendar listing requested for {}", date);

        match calendar.list_events_for_date(date).await {
            Ok(meetings) => json_result(&CalendarDataResult {
                date: date.format("%Y-%m-%d").to_string(),
                meetings,
            }),
            Err(e) => {
                error!("Calendar listing failed: {}", e);
                error_result(ToolError::from(e))
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GetCalendarDataParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the rmcp tool router.
    pub fn create_route<S>(calendar: Arc<CalendarService>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let calendar = calendar.clone();
            async move {
                let result = match parse_arguments::<GetCalendarDataParams>(args) {
                    Ok(params) => Self::execute(&params, &calendar).await,
                    Err(result) => result,
                };
                Ok::<_, McpError>(result)
            }
            .boxed()
        })
    }
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 instant taken as its UTC date.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|instant| instant.with_timezone(&Utc).date_naive())
    })
}

// ============================================================================
// Tests
// ============================================================================
