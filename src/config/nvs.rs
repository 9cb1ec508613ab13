//! NVS persistence for the deactivation code.
//!
//! One raw blob of [`CODE_LENGTH`] bytes under `alarm_code/code`. A missing
//! or wrong-sized blob falls back to [`DEFAULT_CODE`].

use crate::peripherals::CODE_LENGTH;

#[cfg(target_os = "espidf")]
use crate::peripherals::CodeStore;
#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::*;
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// NVS namespace for the alarm code
pub const NVS_NAMESPACE: &str = "alarm_code";

/// NVS key for the code blob
pub const CODE_KEY: &str = "code";

/// Code used until the operator configures one
pub const DEFAULT_CODE: [u8; CODE_LENGTH] = *b"1805";

/// NVS operation errors
#[cfg(target_os = "espidf")]
#[derive(Debug)]
pub enum NvsError {
    /// NVS initialization failed
    InitFailed(EspError),
    /// NVS read/write error
    IoError(EspError),
}

#[cfg(target_os = "espidf")]
impl From<EspError> for NvsError {
    fn from(e: EspError) -> Self {
        NvsError::IoError(e)
    }
}

/// Pick the stored code if it has the right length.
pub fn code_from_blob(blob: Option<&[u8]>) -> [u8; CODE_LENGTH] {
    match blob {
        Some(bytes) if bytes.len() == CODE_LENGTH => {
            let mut code = [0u8; CODE_LENGTH];
            code.copy_from_slice(bytes);
            code
        }
        _ => DEFAULT_CODE,
    }
}

/// Code store backed by the default NVS partition.
#[cfg(target_os = "espidf")]
pub struct NvsCodeStore {
    storage: EspNvs<NvsDefault>,
    code: [u8; CODE_LENGTH],
}

#[cfg(target_os = "espidf")]
impl NvsCodeStore {
    /// Open the namespace and load the stored code.
    pub fn open(partition: EspDefaultNvsPartition) -> Result<Self, NvsError> {
        let storage = EspNvs::new(partition, NVS_NAMESPACE, true)
            .map_err(NvsError::InitFailed)?;

        let mut buf = [0u8; CODE_LENGTH];
        let code = code_from_blob(storage.get_raw(CODE_KEY, &mut buf)?);

        Ok(Self { storage, code })
    }

    /// Compare an entered unlock code with the stored one
    pub fn matches(&self, entered: &[u8]) -> bool {
        entered == self.code.as_slice()
    }

    fn save(&mut self) -> Result<(), NvsError> {
        self.storage.set_raw(CODE_KEY, &self.code)?;
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl CodeStore for NvsCodeStore {
    fn write_new_code(&mut self, code: &[u8; CODE_LENGTH]) {
        self.code = *code;
        if let Err(e) = self.save() {
            crate::log_error!(crate::CONSOLE_LOG, 0, "code save failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_of_right_length_is_used() {
        assert_eq!(code_from_blob(Some(b"4321")), *b"4321");
    }

    #[test]
    fn test_missing_or_bad_blob_falls_back() {
        assert_eq!(code_from_blob(None), DEFAULT_CODE);
        assert_eq!(code_from_blob(Some(b"12")), DEFAULT_CODE);
        assert_eq!(code_from_blob(Some(b"123456")), DEFAULT_CODE);
    }

    #[test]
    fn test_nvs_namespace_constant() {
        assert_eq!(NVS_NAMESPACE, "alarm_code");
    }
}
