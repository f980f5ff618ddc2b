//! Tool Router - builds the rmcp ToolRouter.
//!
//! Each tool knows how to create its own route; this module only lists them.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{AddCalendarEventTool, GetCalendarDataTool};
use crate::domains::calendar::CalendarService;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(calendar: Arc<CalendarService>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GetCalendarDataTool::create_route(calendar.clone()))
        .with_route(AddCalendarEventTool::create_route(calendar))
}
