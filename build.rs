use std::env;

/// Build-time secrets, passed through to `option_env!` in the crate.
const SECRET_VARS: [&str; 4] = ["THINGSPEAK_API_KEY", "WIFI_SSID", "WIFI_PASS", "REMOTE_PSK"];

fn main() {
    for var in SECRET_VARS {
        println!("cargo:rerun-if-env-changed={var}");
        if let Ok(value) = env::var(var) {
            println!("cargo:rustc-env={var}={value}");
        }
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
