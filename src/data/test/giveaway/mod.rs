use crate::{
    data::giveaway::GiveawayRepository,
    error::AppError,
    model::giveaway::{GiveawayStatus, StartGiveawayParams},
};
use chrono::{Duration, Utc};
use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};
use test_utils::{builder::TestBuilder, factory::giveaway::GiveawayFactory};

mod create;
mod mark_ended;
