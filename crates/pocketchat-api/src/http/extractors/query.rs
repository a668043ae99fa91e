//! Query parameters of `GET /api/rpc/{procedure}`.

use serde::Deserialize;

/// `?input=<json>`; absent means "no input".
#[derive(Debug, Deserialize, Default)]
pub struct RpcQuery {
    pub input: Option<String>,
}
