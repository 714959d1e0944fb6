//! The reconciliation sweeps and how often they run.

use std::sync::Arc;

use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::TaskIntervals,
    scheduler::Scheduler,
    service::{
        ban::BanService, giveaway::GiveawayService, moderator::ModeratorService,
        rank::RankService, stream::StreamService, warning::WarningService, xp::XpService,
    },
    state::AppState,
};

/// Registers every sweep with the scheduler.
///
/// Stream polling is only registered when a stream provider is configured.
pub fn register_all(scheduler: &mut Scheduler, state: Arc<AppState>, intervals: &TaskIntervals) {
    let s = state.clone();
    scheduler.register("ban_expiry", intervals.ban_expiry, move |shutdown| {
        let state = s.clone();
        async move {
            BanService::new(&state.db, &state.discord)
                .expire_bans(Utc::now(), &shutdown)
                .await
        }
    });

    let s = state.clone();
    scheduler.register(
        "warning_reminder",
        intervals.warning_reminder,
        move |shutdown| {
            let state = s.clone();
            async move {
                WarningService::new(&state.db, &state.discord, &state.policy.warning)
                    .enforce_deadlines(Utc::now(), &shutdown)
                    .await
            }
        },
    );

    let s = state.clone();
    scheduler.register("xp_voice", intervals.xp_voice, move |shutdown| {
        let state = s.clone();
        async move {
            XpService::new(&state.db, &state.discord, &state.discord, &state.policy.xp)
                .credit_voice(Utc::now(), &shutdown)
                .await
        }
    });

    let s = state.clone();
    scheduler.register("xp_decay", intervals.xp_decay, move |shutdown| {
        let state = s.clone();
        async move {
            XpService::new(&state.db, &state.discord, &state.discord, &state.policy.xp)
                .decay(Utc::now(), &shutdown)
                .await
        }
    });

    let s = state.clone();
    scheduler.register(
        "moderator_voice",
        intervals.moderator_voice,
        move |shutdown| {
            let state = s.clone();
            async move {
                moderators(&state).credit_voice(Utc::now(), &shutdown).await
            }
        },
    );

    let s = state.clone();
    scheduler.register(
        "moderator_inactivity",
        intervals.moderator_inactivity,
        move |shutdown| {
            let state = s.clone();
            async move {
                moderators(&state)
                    .enforce_inactivity(Utc::now(), &shutdown)
                    .await
            }
        },
    );

    let s = state.clone();
    scheduler.register(
        "moderator_weekly_rollover",
        intervals.moderator_weekly_rollover,
        move |shutdown| {
            let state = s.clone();
            async move {
                moderators(&state)
                    .weekly_rollover(Utc::now(), &shutdown)
                    .await
            }
        },
    );

    let s = state.clone();
    scheduler.register("rank_sync", intervals.rank_sync, move |shutdown| {
        let state = s.clone();
        async move {
            RankService::new(&state.db, &state.discord, &state.discord, state.rank.as_ref())
                .sync_ranks(Utc::now(), &shutdown)
                .await
        }
    });

    let s = state.clone();
    scheduler.register("giveaway_end", intervals.giveaway_end, move |shutdown| {
        let state = s.clone();
        async move {
            let mut rng = StdRng::from_os_rng();
            giveaways(&state)
                .end_due(Utc::now(), &shutdown, &mut rng)
                .await
        }
    });

    let s = state.clone();
    scheduler.register(
        "giveaway_countdown",
        intervals.giveaway_countdown,
        move |shutdown| {
            let state = s.clone();
            async move { giveaways(&state).countdown(Utc::now(), &shutdown).await }
        },
    );

    if let Some(provider) = state.stream.clone() {
        let s = state.clone();
        scheduler.register("stream_poll", intervals.stream_poll, move |shutdown| {
            let state = s.clone();
            let provider = provider.clone();
            async move {
                StreamService::new(&state.db, &state.discord, &state.discord, provider.as_ref())
                    .poll(Utc::now(), &shutdown)
                    .await
            }
        });
    } else {
        tracing::info!("No stream provider configured, stream polling disabled");
    }
}

fn moderators(state: &AppState) -> ModeratorService<'_> {
    ModeratorService::new(
        &state.db,
        &state.discord,
        &state.discord,
        &state.policy.moderator,
    )
}

fn giveaways(state: &AppState) -> GiveawayService<'_> {
    GiveawayService::new(
        &state.db,
        &state.discord,
        &state.discord,
        &state.policy.giveaway,
    )
}
