pub mod activity;
pub mod admissions;
pub mod knowledge;
pub mod ollama;
pub mod openai_chat;
pub mod users;

pub use activity::FileActivityLog;
pub use admissions::JsonAdmissionStore;
pub use knowledge::FileKnowledgeStore;
pub use ollama::OllamaProvider;
pub use openai_chat::OpenAiChatProvider;
pub use users::JsonUserStore;
