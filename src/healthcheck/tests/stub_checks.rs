//! Minimal check types with fixed behaviour for group and runner tests.

use async_trait::async_trait;

use crate::database::domain::DatabaseType;
use crate::healthcheck::{
    domain::{CheckMetadata, DatabaseTypeSet, Team},
    ports::{Healthcheck, HealthcheckType},
    services::CheckContext,
};

/// Reports one CORRECT record and passes.
#[derive(Debug)]
pub(super) struct AlwaysPasses(CheckMetadata);

impl HealthcheckType for AlwaysPasses {
    fn create() -> Self {
        Self(CheckMetadata::new("AlwaysPasses", "passes", Team::Core))
    }
}

#[async_trait]
impl Healthcheck for AlwaysPasses {
    fn metadata(&self) -> &CheckMetadata {
        &self.0
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        ctx.correct("all good");
        true
    }
}

/// Returns `false` without writing any record.
#[derive(Debug)]
pub(super) struct FailsSilently(CheckMetadata);

impl HealthcheckType for FailsSilently {
    fn create() -> Self {
        Self(CheckMetadata::new("FailsSilently", "fails quietly", Team::Core))
    }
}

#[async_trait]
impl Healthcheck for FailsSilently {
    fn metadata(&self) -> &CheckMetadata {
        &self.0
    }

    async fn run(&self, _ctx: &CheckContext<'_>) -> bool {
        false
    }
}

/// Reports a PROBLEM but returns `true`.
#[derive(Debug)]
pub(super) struct ProblemButPasses(CheckMetadata);

impl HealthcheckType for ProblemButPasses {
    fn create() -> Self {
        Self(CheckMetadata::new(
            "ProblemButPasses",
            "reports a problem yet returns true",
            Team::Core,
        ))
    }
}

#[async_trait]
impl Healthcheck for ProblemButPasses {
    fn metadata(&self) -> &CheckMetadata {
        &self.0
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        ctx.problem("something is off");
        true
    }
}

/// Applies to funcgen databases only; warns and passes.
#[derive(Debug)]
pub(super) struct FuncgenOnly(CheckMetadata);

impl HealthcheckType for FuncgenOnly {
    fn create() -> Self {
        Self(
            CheckMetadata::new("FuncgenOnly", "funcgen only", Team::Funcgen)
                .applying_to(DatabaseTypeSet::only(&[DatabaseType::Funcgen])),
        )
    }
}

#[async_trait]
impl Healthcheck for FuncgenOnly {
    fn metadata(&self) -> &CheckMetadata {
        &self.0
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        ctx.warning("funcgen looked at");
        true
    }
}

/// Advertised as long-running; passes.
#[derive(Debug)]
pub(super) struct SlowCheck(CheckMetadata);

impl HealthcheckType for SlowCheck {
    fn create() -> Self {
        Self(CheckMetadata::new("SlowCheck", "takes a while", Team::Production).long_running())
    }
}

#[async_trait]
impl Healthcheck for SlowCheck {
    fn metadata(&self) -> &CheckMetadata {
        &self.0
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        ctx.correct("done eventually");
        true
    }
}

/// Reports under a name that differs from its type name.
#[derive(Debug)]
pub(super) struct Misnamed(CheckMetadata);

impl HealthcheckType for Misnamed {
    fn create() -> Self {
        Self(CheckMetadata::new("AlwaysPasses", "borrows a name", Team::Core))
    }
}

#[async_trait]
impl Healthcheck for Misnamed {
    fn metadata(&self) -> &CheckMetadata {
        &self.0
    }

    async fn run(&self, _ctx: &CheckContext<'_>) -> bool {
        true
    }
}

/// A second check type sharing a short name with [`AlwaysPasses`].
pub(super) mod namesake {
    use async_trait::async_trait;

    use crate::healthcheck::{
        domain::{CheckMetadata, Team},
        ports::{Healthcheck, HealthcheckType},
        services::CheckContext,
    };

    #[derive(Debug)]
    pub(in crate::healthcheck::tests) struct AlwaysPasses(CheckMetadata);

    impl HealthcheckType for AlwaysPasses {
        fn create() -> Self {
            Self(CheckMetadata::new("AlwaysPasses", "same name, other module", Team::Core))
        }
    }

    #[async_trait]
    impl Healthcheck for AlwaysPasses {
        fn metadata(&self) -> &CheckMetadata {
            &self.0
        }

        async fn run(&self, _ctx: &CheckContext<'_>) -> bool {
            true
        }
    }
}
