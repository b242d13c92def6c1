//! Libris MCP Server implementation
//!
//! Each tool maps onto one Libris API call and returns the API's plain-text
//! answer. API failures come back as tool errors so the model can read them.

use crate::client::LibrisClient;
use anyhow::Result;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{
    handler::server::tool::ToolRouter,
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

/// Libris MCP Server
///
/// Lets an assistant browse the catalog and lend or take back books with the
/// credentials it was started with.
#[derive(Clone)]
pub struct LibrisServer {
    client: LibrisClient,
    tool_router: ToolRouter<Self>,
}

impl LibrisServer {
    pub fn from_env() -> Result<Self> {
        let client = LibrisClient::from_env()?;
        Ok(Self::new(client))
    }

    pub fn new(client: LibrisClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }
}

/// Turn an API answer into a tool result
fn tool_result(result: Result<String>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(content) => Ok(CallToolResult::success(vec![Content::text(content)])),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

// --- Tool Parameter Types ---

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Text to look for in titles and authors (case-insensitive)
    pub query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BookParams {
    /// Book ID, e.g. "B1"
    pub book_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BorrowParams {
    /// Book ID, e.g. "B1"
    pub book_id: String,
    /// Member who takes the book. Members may omit it to borrow for themselves;
    /// the manager must name one.
    #[serde(default)]
    pub member_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddBookParams {
    /// Book ID; an existing ID replaces that book's title and author
    pub id: String,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RegisterMemberParams {
    /// Member ID, e.g. "M3"
    pub id: String,
    pub name: String,
}

#[tool_router]
impl LibrisServer {
    // === Catalog ===

    #[tool(description = "List every book in the catalog with its availability.")]
    async fn list_books(&self) -> Result<CallToolResult, McpError> {
        tool_result(self.client.list_books().await)
    }

    #[tool(description = "List the books that are not on loan right now.")]
    async fn available_books(&self) -> Result<CallToolResult, McpError> {
        tool_result(self.client.available_books().await)
    }

    #[tool(description = "Find books whose title or author contains the given text.")]
    async fn search_books(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.client.search_books(&params.0.query).await)
    }

    #[tool(description = "Show one book by its ID.")]
    async fn book_details(&self, params: Parameters<BookParams>) -> Result<CallToolResult, McpError> {
        tool_result(self.client.book_details(&params.0.book_id).await)
    }

    // === Lending ===

    #[tool(
        description = "Borrow a book. Fails if the book or member is unknown or the book is already on loan."
    )]
    async fn borrow(&self, params: Parameters<BorrowParams>) -> Result<CallToolResult, McpError> {
        tool_result(
            self.client
                .borrow(&params.0.book_id, params.0.member_id.as_deref())
                .await,
        )
    }

    #[tool(description = "Return a borrowed book. Fails if the book has no active loan.")]
    async fn return_book(&self, params: Parameters<BookParams>) -> Result<CallToolResult, McpError> {
        tool_result(self.client.return_book(&params.0.book_id).await)
    }

    #[tool(description = "List active loans: which member has which book since when.")]
    async fn loans(&self) -> Result<CallToolResult, McpError> {
        tool_result(self.client.loans().await)
    }

    // === Management (manager only) ===

    #[tool(description = "Add a book to the catalog, or update its title and author. Manager only.")]
    async fn add_book(&self, params: Parameters<AddBookParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        tool_result(self.client.add_book(&p.id, &p.title, &p.author).await)
    }

    #[tool(description = "Register a library member, or rename an existing one. Manager only.")]
    async fn register_member(
        &self,
        params: Parameters<RegisterMemberParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            self.client
                .register_member(&params.0.id, &params.0.name)
                .await,
        )
    }

    // === Session ===

    #[tool(description = "Check the configured credentials and show whether you act as manager or member.")]
    async fn whoami(&self) -> Result<CallToolResult, McpError> {
        tool_result(self.client.whoami().await)
    }
}

#[tool_handler]
impl ServerHandler for LibrisServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "libris".into(),
                title: Some("Libris MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                r#"Libris - library catalog and lending

SETUP: Set LIBRIS_USER to a member id (e.g. M1) or the manager name, and
LIBRIS_PASSWORD for the manager. LIBRIS_API_URL points at the API.

WORKFLOW:
1. 'whoami' - Confirm your role
2. 'list_books' / 'available_books' / 'search_books' - Find a book
3. 'borrow' - Take a book out (one loan per book at a time)
4. 'loans' - See what is out and with whom
5. 'return_book' - Bring it back

MANAGER:
- 'add_book' and 'register_member' grow the catalog"#
                    .into(),
            ),
        }
    }
}
