//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    app_settings::StarsignSettings,
    clock::{SystemClock, SystemRandom},
    ports::{
        CharacterRepo, ClockPort, CompendiumRepo, EffectRepo, NotificationPort, RandomPort,
        TableRepo,
    },
};
use crate::use_cases;

/// Main application state.
///
/// Holds the ports handed in by the host adapter and the use cases built on
/// top of them.
pub struct App {
    pub settings: Arc<StarsignSettings>,
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub notifier: Arc<dyn NotificationPort>,
}

/// Container for the port implementations.
#[derive(Clone)]
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub effect: Arc<dyn EffectRepo>,
    pub table: Arc<dyn TableRepo>,
    pub compendium: Arc<dyn CompendiumRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub resolve: Arc<use_cases::ResolveTable>,
    pub draw: Arc<use_cases::DrawTrait>,
    pub assignment: Arc<use_cases::AssignmentUseCases>,
    pub power: Arc<use_cases::PowerUseCases>,
}

impl App {
    /// Create a new App with the system clock and random source.
    pub fn new(
        repositories: Repositories,
        notifier: Arc<dyn NotificationPort>,
        settings: StarsignSettings,
    ) -> Self {
        Self::with_clock(
            repositories,
            notifier,
            settings,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        )
    }

    /// Create a new App with injected time and randomness.
    pub fn with_clock(
        repositories: Repositories,
        notifier: Arc<dyn NotificationPort>,
        settings: StarsignSettings,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let settings = Arc::new(settings);

        let resolve = Arc::new(use_cases::ResolveTable::new(
            repositories.table.clone(),
            repositories.compendium.clone(),
            settings.search_compendia,
        ));
        let draw = Arc::new(use_cases::DrawTrait::new(repositories.table.clone()));

        let assignment = Arc::new(use_cases::AssignmentUseCases::new(
            repositories.character.clone(),
            resolve.clone(),
            draw.clone(),
            notifier.clone(),
            clock.clone(),
            settings.clone(),
        ));

        let power = Arc::new(use_cases::PowerUseCases::new(
            repositories.character.clone(),
            repositories.effect.clone(),
            repositories.compendium.clone(),
            notifier.clone(),
            clock,
            random,
            settings.clone(),
        ));

        Self {
            settings,
            repositories,
            use_cases: UseCases {
                resolve,
                draw,
                assignment,
                power,
            },
            notifier,
        }
    }
}
