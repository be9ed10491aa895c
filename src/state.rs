use crate::common::scratch::ScratchStore;
use crate::config::settings::AppConfig;
use crate::workers::transcoder::Transcoder;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub scratch: ScratchStore,
    pub transcoder: Transcoder,
}

impl AppState {
    pub fn new(config: AppConfig, scratch: ScratchStore, transcoder: Transcoder) -> Self {
        Self {
            config,
            scratch,
            transcoder,
        }
    }

    pub fn from_config(config: AppConfig) -> std::io::Result<Self> {
        let scratch = ScratchStore::new(&config.scratch_dir)?;
        let transcoder = Transcoder::from_config(&config);
        Ok(Self::new(config, scratch, transcoder))
    }
}
