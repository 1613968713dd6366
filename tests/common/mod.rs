#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, Duration, Utc};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use uuid::Uuid;

use fleet::AppState;
use fleet::config::Config;
use fleet::database::MemoryStore;
use fleet::database::models::*;
use fleet::database::store::{BikeStore, GarageStore, ShiftStore};
use fleet::services::actor::{Actor, Claims};
use fleet::services::notifier::{Mail, RecordingNotifier};
use fleet::services::{AvailabilityResolver, FixedClock, FleetService, PayrollService, ShiftLifecycle};

/// Monday 4 March 2024, 09:00 UTC.
pub const NOW: &str = "2024-03-04T09:00:00Z";

pub fn setup_test_env() {
    unsafe {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn utc(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid RFC 3339 timestamp")
}

/// Everything a test needs: an in-memory store, a pinned clock and a mail
/// recorder, wired the same way `main` wires the real ones.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,
    pub config: Config,
    pub state: web::Data<AppState>,
    pub admin: Actor,
}

impl TestContext {
    pub fn new() -> Self {
        Self::at(NOW)
    }

    pub fn at(now: &str) -> Self {
        Self::build(now, RecordingNotifier::default())
    }

    /// Every outgoing mail fails.
    pub fn with_failing_mail() -> Self {
        Self::build(NOW, RecordingNotifier::failing())
    }

    fn build(now: &str, notifier: RecordingNotifier) -> Self {
        setup_test_env();
        let config = Config::test_config();
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(notifier);
        let clock = Arc::new(FixedClock::new(config.local_offset(), utc(now)));
        let state = web::Data::new(AppState::new(
            store.clone(),
            clock.clone(),
            notifier.clone(),
        ));

        Self {
            store,
            notifier,
            clock,
            config,
            state,
            admin: Actor::admin(Uuid::new_v4()),
        }
    }

    pub fn lifecycle(&self) -> &ShiftLifecycle {
        &self.state.shifts
    }

    pub fn availability(&self) -> &AvailabilityResolver {
        &self.state.availability
    }

    pub fn fleet(&self) -> &FleetService {
        &self.state.fleet
    }

    pub fn payroll(&self) -> &PayrollService {
        &self.state.payroll
    }

    pub fn now(&self) -> DateTime<Utc> {
        use fleet::services::Clock;
        self.clock.now_utc()
    }

    pub async fn garage(&self) -> Garage {
        let garage = Garage::new(GarageInput {
            name: format!("{} depot", Name().fake::<String>()),
            lat: 51.5,
            lng: -0.12,
            capacity: 20,
        });
        self.store.insert_garage(&garage).await.unwrap();
        garage
    }

    pub async fn bike(&self, garage: &Garage, number: i32, engine_size: i32) -> Bike {
        let bike = Bike::new(
            BikeInput {
                garage_id: garage.id,
                registration: format!("LX{:02} ABC", number),
                bike_number: number,
                vin: Uuid::new_v4().simple().to_string(),
                engine_size,
                available: true,
            },
            self.admin.id,
            self.now(),
        );
        self.store.insert_bike(&bike).await.unwrap();
        bike
    }

    pub async fn driver(&self, license: LicenseClass) -> Driver {
        let driver = Driver {
            id: Uuid::new_v4(),
            name: Name().fake(),
            email: SafeEmail().fake(),
            license,
            blocked: false,
            created_at: self.now(),
        };
        self.store.insert_driver(driver.clone()).await;
        driver
    }

    /// Stores a shift directly, bypassing booking validation.
    pub async fn shift(
        &self,
        bike: &Bike,
        driver: &Driver,
        date: &str,
        status: ShiftStatus,
    ) -> Shift {
        let mut shift = Shift::booked(
            bike.garage_id,
            bike.id,
            driver.id,
            utc(date),
            driver.id,
            self.now(),
        );
        shift.status = status;
        self.store.insert_shift(&shift).await.unwrap();
        shift
    }

    pub async fn reload(&self, shift: &Shift) -> Shift {
        self.store
            .find_shift(shift.id)
            .await
            .unwrap()
            .expect("shift still stored")
    }

    /// Mails are sent from a spawned task; give it a chance to run.
    pub async fn wait_for_mail(&self, count: usize) -> Vec<Mail> {
        for _ in 0..100 {
            if self.notifier.sent().len() >= count {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.notifier.sent()
    }
}

pub fn booking(garage: &Garage, bike: &Bike, date: &str, hour: i32) -> CreateShiftInput {
    CreateShiftInput {
        garage_id: garage.id,
        bike_id: bike.id,
        date: date.to_string(),
        hour,
    }
}

pub struct AuthHelper;

impl AuthHelper {
    pub fn token(config: &Config, actor: &Actor) -> String {
        Claims::new(actor.id, actor.is_admin, Duration::hours(1))
            .encode(&config.jwt_secret)
            .unwrap()
    }

    pub fn bearer(config: &Config, actor: &Actor) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", Self::token(config, actor)))
    }
}

/// Builds the full application around a `TestContext`.
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .app_data(actix_web::web::Data::new($ctx.config.clone()))
                .wrap(fleet::middleware::RequestId)
                .configure(fleet::routes::configure),
        )
        .await
    };
}
