use std::time::Duration;

pub(crate) const DEFAULT_LLM_MODEL: &str = "gemini-2.5-flash";
pub(crate) const DEFAULT_EMBEDDING_MODEL: &str = "embedding-001";

pub(crate) const DEFAULT_INDEX_PATH: &str = "data/index.json";
pub(crate) const DEFAULT_REGISTRATION_PATH: &str = "data/registrations.json";

/// Split parameters for ingestion. Windows of `CHUNK_SIZE` characters,
/// stepping by `CHUNK_SIZE - CHUNK_OVERLAP`.
pub(crate) const CHUNK_SIZE: usize = 1000;
pub(crate) const CHUNK_OVERLAP: usize = 200;

pub(crate) const RETRIEVE_TOP_K: usize = 5;

/// Upper bound on consecutive tool-call rounds within a single user turn.
/// The model must produce a plain answer before this many rounds elapse,
/// otherwise the turn fails (thread state is preserved).
pub(crate) const MAX_TOOL_ROUNDS: usize = 10;

pub(crate) const NO_RESULTS_SENTINEL: &str = "No specific information found in the documents.";

pub(crate) const API_TIMEOUT: Duration = Duration::from_secs(60);
pub(crate) const API_MAX_ATTEMPTS: usize = 3;
pub(crate) const API_BACKOFF_BASE: Duration = Duration::from_millis(500);

pub(crate) const SYSTEM_PROMPT: &str = "\
You are the school's admissions assistant.

**Knowledge Base**:
- Use `retrieve_school_info` to answer questions about programs, courses, or admissions.

**Registration**:
- If a user wants to register, apply, or be contacted:
  1. Ask for their Name.
  2. Ask for their Email.
  3. Ask for their Area of Interest (e.g. Data Science, Finance, IoT).
  4. Once you have ALL three, use the `save_registration` tool to save them.
  5. Confirm to the user that they are registered.

**Behavior**:
- Be helpful and polite.
- If you miss information for registration, ask for it specifically.
- Do not invent information.";
