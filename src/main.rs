//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; transport selection is decided once at startup.

use academy_enroll::adapters::files::inline::InlineEncoder;
use academy_enroll::adapters::files::object_store::ObjectStoreUploader;
use academy_enroll::adapters::memory::MemoryBackend;
use academy_enroll::adapters::sheets::SheetsSubmission;
use academy_enroll::adapters::supabase::SupabaseRest;
use academy_enroll::adapters::ui::tui::TuiInputPort;
use academy_enroll::ports::{FileStorePort, InputPort, RecordQueryPort, SubmissionPort};
use academy_enroll::shared::config::{AppConfig, TransportKind};
use academy_enroll::usecases::{DashboardService, ExamService, RegistrationService};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    academy_enroll::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_default();

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    tokio::fs::create_dir_all(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir: {}", e))?;
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");
    info!(
        max_upload_mb = cfg.max_upload_bytes() / (1024 * 1024),
        "upload ceiling"
    );

    // One HTTP client, cloned into every adapter that talks to the network.
    let http = reqwest::Client::new();
    let memory = Arc::new(MemoryBackend::new());

    // --- Transport selection: exactly one file/submission strategy per run ---
    let (store, submission, query): (
        Arc<dyn FileStorePort>,
        Arc<dyn SubmissionPort>,
        Arc<dyn RecordQueryPort>,
    ) = match cfg.transport_kind() {
        TransportKind::Inline if cfg.is_inline_configured() => {
            info!("inline transport: base64 payloads to the script endpoints");
            let sheets = Arc::new(SheetsSubmission::new(
                http.clone(),
                cfg.registration_endpoint.clone().unwrap_or_default(),
                cfg.exams_endpoint.clone().unwrap_or_default(),
            ));
            // The script endpoints are write-only; the dashboard still
            // reads from the hosted platform when credentials are present.
            let query: Arc<dyn RecordQueryPort> = if cfg.is_supabase_configured() {
                Arc::new(SupabaseRest::new(
                    http.clone(),
                    cfg.supabase_url.clone().unwrap_or_default(),
                    cfg.supabase_anon_key.clone().unwrap_or_default(),
                ))
            } else {
                warn!("ENROLL_SUPABASE_URL not set, dashboard reads in-memory records only");
                memory.clone()
            };
            (Arc::new(InlineEncoder::new()), sheets, query)
        }
        TransportKind::Storage if cfg.is_supabase_configured() => {
            info!(
                bucket = %cfg.storage_bucket_or_default(),
                "storage transport: object uploads + REST inserts"
            );
            let url = cfg.supabase_url.clone().unwrap_or_default();
            let key = cfg.supabase_anon_key.clone().unwrap_or_default();
            let rest = Arc::new(SupabaseRest::new(http.clone(), url.clone(), key.clone()));
            let uploader = Arc::new(ObjectStoreUploader::new(
                http.clone(),
                url,
                key,
                cfg.storage_bucket_or_default(),
            ));
            (uploader, rest.clone(), rest)
        }
        _ => {
            warn!(
                "transport not configured (set ENROLL_TRANSPORT plus endpoint credentials), \
                 using in-memory backend; nothing leaves this process"
            );
            (memory.clone(), memory.clone(), memory.clone())
        }
    };

    // --- Services ---
    let registration_service = Arc::new(RegistrationService::new(Arc::clone(&submission)));
    let exam_service = Arc::new(ExamService::new(
        Arc::clone(&store),
        Arc::clone(&submission),
        cfg.max_upload_bytes(),
    ));
    let dashboard_service = Arc::new(DashboardService::new(Arc::clone(&query), data_path));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        registration_service,
        exam_service,
        dashboard_service,
        Arc::clone(&query),
    ));

    // --- Run (main menu -> register / exam / dashboard) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
