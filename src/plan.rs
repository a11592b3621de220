//! Resource-plan derivation
//!
//! The plan is the ordered list of logical roles the orchestrator must
//! allocate for a worktree. Order encodes startup precedence: the app
//! slot always comes first, the database before its admin tool.

use crate::detect::compose::DbProvider;

pub const ROLE_APP: &str = "app";
pub const ROLE_DB: &str = "db";
pub const ROLE_DB_TOOL: &str = "dbTool";

pub fn compute_resource_plan(provider: DbProvider, db_tool_enabled: bool) -> Vec<&'static str> {
    let mut plan = vec![ROLE_APP];
    if provider.is_dockerized() {
        plan.push(ROLE_DB);
    }
    if db_tool_enabled {
        plan.push(ROLE_DB_TOOL);
    }
    plan
}
