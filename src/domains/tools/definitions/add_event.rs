//! Event creation tool definition.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::common::{error_result, json_result, non_blank, parse_arguments, require_non_empty};
use crate::domains::calendar::{CalendarService, CreatedEvent, EventRequest};
use crate::domains::tools::ToolError;

/// Parameters for the event creation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCalendarEventParams {
    #[schemars(description = "Summary or title of the event.")]
    pub summary: String,

    #[schemars(description = "Start date of the event in YYYY-MM-DD format.")]
    pub start_date: String,

    #[schemars(description = "Start time of the event in HH:MM format (24-hour).")]
    pub start_time: String,

    #[schemars(description = "End date of the event in YYYY-MM-DD format.")]
    pub end_date: String,

    #[schemars(description = "End time of the event in HH:MM format (24-hour).")]
    pub end_time: String,

    #[schemars(description = "Description for the event.")]
    #[serde(default)]
    pub description: Option<String>,

    #[schemars(description = "Location of the event.")]
    #[serde(default)]
    pub location: Option<String>,
}

impl AddCalendarEventParams {
    fn validate(&self) -> Result<EventRequest, ToolError> {
        require_non_empty("summary", &self.summary)?;
        require_non_empty("startDate", &self.start_date)?;
        require_non_empty("startTime", &self.start_time)?;
        require_non_empty("endDate", &self.end_date)?;
        require_non_empty("endTime", &self.end_time)?;

        Ok(EventRequest {
            summary: self.summary.trim().to_string(),
            start_date: self.start_date.clone(),
            start_time: self.start_time.clone(),
            end_date: self.end_date.clone(),
            end_time: self.end_time.clone(),
            description: non_blank(self.description.as_ref()),
            location: non_blank(self.location.as_ref()),
        })
    }
}

/// Structured output for a created event.
#[derive(Debug, Clone, Serialize)]
pub struct AddCalendarEventResult {
    pub success: bool,
    #[serde(flatten)]
    pub event: CreatedEvent,
}

/// Event creation tool - inserts one timed event into the calendar.
pub struct AddCalendarEventTool;

impl AddCalendarEventTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "addCalendarEvent";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Add an event to my calendar. Dates use YYYY-MM-DD and times use 24-hour HH:MM, interpreted at UTC+06:00 (Asia/Dhaka). Returns the event id, link, title, start and end.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(summary = %params.summary))]
    pub async fn execute(params: &AddCalendarEventParams, calendar: &CalendarService) -> CallToolResult {
        let request = match params.validate() {
            Ok(request) => request,
            Err(e) => return error_result(e),
        };
        info!(
            "Creating event from {} {} to {} {}",
            request.start_date, request.start_time, request.end_date, request.end_time
        );

        match calendar.create_event(&request).await {
            Ok(event) => json_result(&AddCalendarEventResult {
                success: true,
                event,
            }),
            Err(e) => {
                error!("Event creation failed: {}", e);
                error_result(ToolError::from(e))
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<AddCalendarEventParams>().into(),
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
                let result = match parse_arguments::<AddCalendarEventParams>(args) {
                    Ok(params) => Self::execute(&params, &calendar).await,
                    Err(result) => result,
                };
                Ok::<_, McpError>(result)
            }
            .boxed()
        })
    }
}
