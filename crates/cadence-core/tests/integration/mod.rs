mod config_loading;
mod scenario_roundtrip;
mod signing_roundtrip;
