mod settings;

pub use settings::{
    FirebaseConfig, OtelConfig, RelayConfig, ServerConfig, Settings, UpstreamStatusPolicy,
};
