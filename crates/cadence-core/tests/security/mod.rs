mod masking_and_zeroize;
#[cfg(target_os = "linux")]
mod mlock_verification;
mod unlinkability;
