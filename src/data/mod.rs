//! Dataset providers: the remote tables, generated fallback data, and the
//! strategy that falls back from one to the other.

pub mod provider;
pub mod sample;
pub mod supabase;

pub use provider::{DatasetProvider, FallbackProvider, FetchFailure};
pub use sample::generate_sample;
pub use supabase::SupabaseClient;
