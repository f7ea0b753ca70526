// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AuditRepository, CalendarRepository, ComplaintRepository, DashboardRepository, EmployeeRepository,
        InternalComplaintRepository, KycRepository, NotificationRepository, PropertyRepository,
        SearchRepository, UserRepository, VehicleRepository,
    },
    services::{
        AuditService, AuthService, CalendarService, ComplaintService, DashboardService, EmployeeService,
        InternalComplaintService, KycService, NotificationService, PropertyService, SearchService,
        VehicleService,
    },
};

/// Credenciais do primeiro administrador (opcional).
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub static_dir: String,
    pub token_ttl_hours: i64,
    pub db_max_connections: u32,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let token_ttl_hours = var_or("TOKEN_TTL_HOURS", "24")
            .parse::<i64>()
            .context("TOKEN_TTL_HOURS deve ser um número inteiro")?;
        let db_max_connections = var_or("DB_MAX_CONNECTIONS", "5")
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS deve ser um número inteiro")?;

        // Só cria o admin se e-mail e senha vierem juntos
        let bootstrap_admin = match (env::var("BOOTSTRAP_ADMIN_EMAIL"), env::var("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => Some(BootstrapAdmin {
                email,
                password,
                full_name: var_or("BOOTSTRAP_ADMIN_NAME", "Administrator"),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            static_dir: var_or("STATIC_DIR", "public"),
            token_ttl_hours,
            db_max_connections,
            bootstrap_admin,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,

    pub auth_service: AuthService,
    pub property_service: PropertyService,
    pub employee_service: EmployeeService,
    pub complaint_service: ComplaintService,
    pub internal_complaint_service: InternalComplaintService,
    pub kyc_service: KycService,
    pub vehicle_service: VehicleService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
    pub calendar_service: CalendarService,
    pub search_service: SearchService,
    pub audit_service: AuditService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    /// Monta o grafo de dependências em cima de um pool já criado.
    pub fn from_pool(db_pool: PgPool, config: Config) -> Self {
        // --- Repositórios ---
        let user_repo = UserRepository::new(db_pool.clone());
        let property_repo = PropertyRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());
        let complaint_repo = ComplaintRepository::new(db_pool.clone());
        let internal_repo = InternalComplaintRepository::new(db_pool.clone());
        let kyc_repo = KycRepository::new(db_pool.clone());
        let vehicle_repo = VehicleRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());
        let audit_repo = AuditRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let calendar_repo = CalendarRepository::new(db_pool.clone());
        let search_repo = SearchRepository::new(db_pool.clone());

        // --- Serviços ---
        let notification_service = NotificationService::new(notification_repo.clone(), employee_repo.clone());

        let auth_service = AuthService::new(
            user_repo,
            employee_repo.clone(),
            config.jwt_secret.clone(),
            config.token_ttl_hours,
            db_pool.clone(),
        );
        let property_service = PropertyService::new(property_repo.clone(), audit_repo.clone(), db_pool.clone());
        let employee_service = EmployeeService::new(
            employee_repo.clone(),
            audit_repo.clone(),
            notification_service.clone(),
            db_pool.clone(),
        );
        let complaint_service = ComplaintService::new(
            complaint_repo,
            property_repo.clone(),
            employee_repo.clone(),
            audit_repo.clone(),
            notification_service.clone(),
            db_pool.clone(),
        );
        let internal_complaint_service = InternalComplaintService::new(
            internal_repo,
            employee_repo.clone(),
            audit_repo.clone(),
            notification_service.clone(),
            db_pool.clone(),
        );
        let kyc_service = KycService::new(
            kyc_repo,
            property_repo.clone(),
            employee_repo,
            audit_repo.clone(),
            notification_service.clone(),
            db_pool.clone(),
        );
        let vehicle_service = VehicleService::new(vehicle_repo, property_repo, audit_repo.clone(), db_pool.clone());
        let dashboard_service =
            DashboardService::new(dashboard_repo, audit_repo.clone(), notification_repo, db_pool.clone());
        let calendar_service = CalendarService::new(calendar_repo);
        let search_service = SearchService::new(search_repo);
        let audit_service = AuditService::new(audit_repo);

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            property_service,
            employee_service,
            complaint_service,
            internal_complaint_service,
            kyc_service,
            vehicle_service,
            notification_service,
            dashboard_service,
            calendar_service,
            search_service,
            audit_service,
        }
    }
}
