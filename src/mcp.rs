use std::sync::{Arc, Mutex};

use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::pagination::{PaginationController, PreviewPage};
use crate::select::pattern;
use crate::select::request::{self, SliceRequest};
use crate::session::{ActiveDocument, Session, DEFAULT_BATCH_SIZE};
use crate::store::{DocumentMeta, DocumentStore};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DocumentIdRequest {
    #[schemars(description = "Id of the document")]
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PatternRequest {
    #[schemars(description = "Page pattern, e.g. '1, 3-5, 10'")]
    pub pattern: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PageRequest {
    #[schemars(description = "1-based page number to toggle")]
    pub page: u32,
}

struct ServerState {
    store: DocumentStore,
    session: Session,
}

#[derive(Clone)]
pub struct PickServer {
    state: Arc<Mutex<ServerState>>,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PickServer {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            state: Arc::new(Mutex::new(ServerState {
                store,
                session: Session::default(),
            })),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PickServer {
    #[tool(description = "List all documents in the store with id, name, and page count")]
    fn list_documents(&self) -> String {
        let state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return "Error: session state poisoned".to_string(),
        };
        let documents: Vec<&DocumentMeta> = state.store.list().collect();
        serde_json::to_string_pretty(&documents).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(
        description = "Make a document the active one for the picking session. Resets any previous selection and preview window."
    )]
    fn select_document(
        &self,
        Parameters(DocumentIdRequest { id }): Parameters<DocumentIdRequest>,
    ) -> String {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return "Error: session state poisoned".to_string(),
        };
        let meta = match state.store.get(&id) {
            Ok(meta) => meta.clone(),
            Err(e) => return format!("Error: {}", e),
        };
        state.session.select(meta.clone(), DEFAULT_BATCH_SIZE);
        serde_json::to_string_pretty(&meta).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(
        description = "Load the next batch of page previews for the active document. Call repeatedly until exhausted."
    )]
    fn load_previews(&self) -> String {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return "Error: session state poisoned".to_string(),
        };
        let ServerState { store, session } = &mut *state;
        let Some(active) = session.active_mut() else {
            return "Error: No document selected".to_string();
        };

        let Some(ticket) = active.pagination.begin_fetch() else {
            if active.pagination.is_exhausted() {
                return status_json(&active.meta.id, &active.pagination, Vec::new());
            }
            return "Error: A preview fetch is already in flight".to_string();
        };

        match store.fetch_preview_batch(&ticket.doc_id, ticket.offset, ticket.batch_size) {
            Ok(batch) => {
                let loaded = batch.pages.clone();
                active.pagination.apply(&ticket, batch);
                status_json(&active.meta.id, &active.pagination, loaded)
            }
            Err(e) => {
                active.pagination.fail(&ticket);
                format!("Error: {}", e)
            }
        }
    }

    #[tool(
        description = "Set the typed page pattern for the active document, e.g. '1, 3-5, 10'. Replaces any previously set pattern; toggled pages are kept."
    )]
    fn set_pattern(
        &self,
        Parameters(PatternRequest { pattern: input }): Parameters<PatternRequest>,
    ) -> String {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return "Error: session state poisoned".to_string(),
        };
        let Some(active) = state.session.active_mut() else {
            return "Error: No document selected".to_string();
        };
        match pattern::parse(&input, active.meta.pages) {
            Ok(pages) => {
                active.selection.set_parsed(pages);
                selection_json(active)
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Toggle a single page of the active document in or out of the selection")]
    fn toggle_page(&self, Parameters(PageRequest { page }): Parameters<PageRequest>) -> String {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return "Error: session state poisoned".to_string(),
        };
        let Some(active) = state.session.active_mut() else {
            return "Error: No document selected".to_string();
        };
        if page < 1 || page > active.meta.pages {
            return format!(
                "Error: Page {} is out of range (1-{})",
                page, active.meta.pages
            );
        }
        active.selection.toggle(page);
        selection_json(active)
    }

    #[tool(description = "Show the current selection: reconciled pages and range hint")]
    fn show_selection(&self) -> String {
        let state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return "Error: session state poisoned".to_string(),
        };
        let Some(active) = state.session.active() else {
            return "Error: No document selected".to_string();
        };
        selection_json(active)
    }

    #[tool(
        description = "Create a new document from the current selection. Resets the selection on success."
    )]
    fn slice_selected(&self) -> String {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return "Error: session state poisoned".to_string(),
        };
        let ServerState { store, session } = &mut *state;
        let Some(active) = session.active_mut() else {
            return "Error: No document selected".to_string();
        };

        let slice_request = match request::build(active.selection.pages(), active.selection.hint())
        {
            Ok(req) => req,
            Err(e) => return format!("Error: {}", e),
        };

        match store.slice(&active.meta.id, &slice_request) {
            Ok(new_meta) => {
                active.reset();
                let result = SliceResult {
                    document: new_meta,
                    request: slice_request,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Delete a document from the store")]
    fn delete_document(
        &self,
        Parameters(DocumentIdRequest { id }): Parameters<DocumentIdRequest>,
    ) -> String {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return "Error: session state poisoned".to_string(),
        };
        match state.store.delete(&id) {
            Ok(()) => {
                state.session.clear_if(&id);
                format!("Deleted {}", id)
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize)]
pub struct PreviewLoadResult {
    pub doc_id: String,
    pub loaded: Vec<PreviewPage>,
    pub fetched_so_far: u32,
    pub total_pages: u32,
    pub exhausted: bool,
}

#[derive(Debug, Serialize)]
pub struct SelectionResult {
    pub doc_id: String,
    pub pages: Vec<u32>,
    pub start_page: Option<u32>,
    pub end_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SliceResult {
    pub document: DocumentMeta,
    pub request: SliceRequest,
}

fn status_json(doc_id: &str, pagination: &PaginationController, loaded: Vec<PreviewPage>) -> String {
    let result = PreviewLoadResult {
        doc_id: doc_id.to_string(),
        loaded,
        fetched_so_far: pagination.pages().len() as u32,
        total_pages: pagination.total_pages(),
        exhausted: pagination.is_exhausted(),
    };
    serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
}

fn selection_json(active: &ActiveDocument) -> String {
    let hint = active.selection.hint();
    let result = SelectionResult {
        doc_id: active.meta.id.clone(),
        pages: active.selection.pages().to_vec(),
        start_page: hint.map(|(start, _)| start),
        end_page: hint.map(|(_, end)| end),
    };
    serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
}

impl ServerHandler for PickServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page-picking session. Use list_documents and select_document to pick a \
                 document, load_previews to page through its previews, set_pattern and \
                 toggle_page to choose pages, and slice_selected to create a new PDF from the \
                 selection."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(store: DocumentStore) -> Result<()> {
    let server = PickServer::new(store);

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
