use super::*;
use crate::{
    config::XpConfig,
    data::{task_marker::TaskMarkerRepository, xp::XpRepository},
    service::xp::{XpService, VOICE_MARKER},
};
use test_utils::factory::xp_profile::XpProfileFactory;

mod decay;

async fn xp_test() -> test_utils::context::TestContext {
    TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .with_table(entity::prelude::XpProfile)
        .with_table(entity::prelude::TaskMarker)
        .build()
        .await
        .unwrap()
}
