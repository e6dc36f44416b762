use anyhow::Result;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const ENV_API_KEY: &str = "HOOKLINE_API_KEY";
const KEYRING_SERVICE: &str = "hookline";
const KEYRING_USER: &str = "openrouter";

/// Where the API key was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env,
    Config,
    Keyring,
    File,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            KeySource::Env => "environment (HOOKLINE_API_KEY)",
            KeySource::Config => "config file",
            KeySource::Keyring => "system keyring",
            KeySource::File => "key file",
        };
        f.write_str(name)
    }
}

/// Storage for the OpenRouter API key
pub struct ApiKeyStore {
    key_file: PathBuf,
}

impl Default for ApiKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiKeyStore {
    pub fn new() -> Self {
        let key_file = crate::config::Config::config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".api_key");
        Self { key_file }
    }

    #[cfg(test)]
    fn with_file(key_file: PathBuf) -> Self {
        Self { key_file }
    }

    fn env_key() -> Option<String> {
        env::var(ENV_API_KEY)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn keyring_get(&self) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
        entry.get_password().ok()
    }

    fn keyring_set(&self, key: &str) -> bool {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            entry.set_password(key).is_ok()
        } else {
            false
        }
    }

    fn file_get(&self) -> Option<String> {
        fs::read_to_string(&self.key_file)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Write the key file with owner-only permissions
    fn file_set(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.key_file.parent() {
            fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.key_file)?;
            file.write_all(key.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.key_file, key)?;
        }

        Ok(())
    }

    /// Resolve the API key: env var, then config, then keyring, then key file
    pub fn resolve(&self, config_key: Option<&str>) -> Result<(String, KeySource)> {
        if let Some(key) = Self::env_key() {
            return Ok((key, KeySource::Env));
        }

        if let Some(key) = config_key.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok((key.to_string(), KeySource::Config));
        }

        if let Some(key) = self.keyring_get() {
            return Ok((key, KeySource::Keyring));
        }

        if let Some(key) = self.file_get() {
            return Ok((key, KeySource::File));
        }

        anyhow::bail!("API key not found. Set HOOKLINE_API_KEY or run 'hookline setup'.")
    }

    /// Store the key in the keyring, or the key file if the keyring is unusable
    pub fn store(&self, key: &str) -> Result<KeySource> {
        if self.keyring_set(key) && self.keyring_get().as_deref() == Some(key) {
            return Ok(KeySource::Keyring);
        }

        tracing::info!("Keyring unavailable, storing API key in {}", self.key_file.display());
        self.file_set(key)?;
        Ok(KeySource::File)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serializes tests that touch HOOKLINE_API_KEY
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn temp_store(name: &str) -> ApiKeyStore {
        let path = env::temp_dir().join(format!(".hookline_key_{}_{}", name, std::process::id()));
        let _ = fs::remove_file(&path);
        ApiKeyStore::with_file(path)
    }

    #[test]
    fn test_env_takes_priority() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let store = temp_store("env");
        store.file_set("file-key").unwrap();

        // SAFETY: guarded by ENV_MUTEX; no other thread reads this variable
        unsafe { env::set_var(ENV_API_KEY, "env-key") };
        let resolved = store.resolve(Some("config-key")).unwrap();
        unsafe { env::remove_var(ENV_API_KEY) };

        assert_eq!(resolved, ("env-key".to_string(), KeySource::Env));
        let _ = fs::remove_file(&store.key_file);
    }

    #[test]
    fn test_config_key_before_stored_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::remove_var(ENV_API_KEY) };
        let store = temp_store("config");

        let resolved = store.resolve(Some("  config-key  ")).unwrap();
        assert_eq!(resolved, ("config-key".to_string(), KeySource::Config));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::set_var(ENV_API_KEY, "   ") };
        let key = ApiKeyStore::env_key();
        unsafe { env::remove_var(ENV_API_KEY) };
        assert!(key.is_none());
    }

    #[test]
    fn test_file_fallback_round_trip() {
        let store = temp_store("file");
        assert!(store.file_get().is_none());

        store.file_set("sk-or-123\n").unwrap();
        assert_eq!(store.file_get(), Some("sk-or-123".to_string()));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&store.key_file).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let _ = fs::remove_file(&store.key_file);
    }

    #[test]
    fn test_key_source_display() {
        assert!(KeySource::Env.to_string().contains("HOOKLINE_API_KEY"));
        assert_eq!(KeySource::File.to_string(), "key file");
    }
}
