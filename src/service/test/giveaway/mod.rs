use super::*;
use crate::{
    config::GiveawayConfig,
    data::giveaway::GiveawayRepository,
    model::giveaway::{GiveawayStatus, StartGiveawayParams},
    service::giveaway::{
        render::{self, Listing},
        GiveawayService,
    },
};
use rand::{rngs::StdRng, SeedableRng};
use test_utils::factory::giveaway::GiveawayFactory;

mod end;
mod entry;
mod start;

async fn giveaway_test() -> test_utils::context::TestContext {
    TestBuilder::new()
        .with_table(entity::prelude::Giveaway)
        .build()
        .await
        .unwrap()
}

fn entrants(ids: &[u64]) -> Vec<String> {
    ids.iter().map(u64::to_string).collect()
}

fn users(ids: &[u64]) -> Vec<UserId> {
    ids.iter().copied().map(UserId::new).collect()
}
