use crate::{
    ChannelOverwrite, Error, PermissionValue, Permissions, Snowflake, TargetKind, UserFlags,
    decode_flags, decompose_snowflake,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn masks() -> impl Iterator<Item = u64> {
    let mut rng = StdRng::seed_from_u64(0x9E37_79B9_7F4A_7C15);
    [0, 1, u64::MAX, 1 << 63, (1 << 31) - 1]
        .into_iter()
        .chain((0..2_000).map(move |_| rng.random::<u64>()))
}

#[test]
fn flag_labels_track_set_bits() {
    for mask in masks() {
        let labels = decode_flags(mask).unwrap();
        let known = mask & UserFlags::all().bits();
        assert_eq!(labels.len(), known.count_ones() as usize);

        // Re-encoding the labels gives back exactly the known bits.
        let rebuilt = labels.iter().fold(0u64, |acc, label| {
            let bit = (0..18)
                .map(|n| UserFlags::from_raw(1 << n))
                .find(|flag| flag.label() == Some(*label))
                .unwrap();
            acc | bit.bits()
        });
        assert_eq!(rebuilt, known);
    }
}

#[test]
fn flag_labels_follow_ascending_bit_order() {
    for mask in 0u64..(1 << 18) {
        let expected: Vec<_> = (0..18)
            .filter(|n| mask & (1 << n) != 0)
            .filter_map(|n| UserFlags::from_raw(1 << n).label())
            .collect();
        assert_eq!(decode_flags(mask).unwrap(), expected, "mask {mask:#x}");
    }
}

#[test]
fn documented_flag_examples() {
    assert_eq!(decode_flags(1u64).unwrap(), ["Staff"]);
    assert_eq!(decode_flags(1u64 << 16).unwrap(), ["Verified Bot"]);
    assert_eq!(
        decode_flags((1u64 << 16) | (1 << 17)).unwrap(),
        ["Verified Bot", "Verified Developer"]
    );
    assert!(matches!(decode_flags("abc"), Err(Error::InvalidInput { .. })));
    assert_eq!(decode_flags("123").unwrap(), decode_flags(123u64).unwrap());
}

#[test]
fn role_values_round_trip_any_mask() {
    for mask in masks() {
        let value = PermissionValue::new(mask, TargetKind::Role).unwrap();
        assert_eq!(u64::from(value), mask);
        let user = PermissionValue::new(mask, TargetKind::User).unwrap();
        assert_eq!(user.enabled_permissions(), value.enabled_permissions());
    }
}

#[test]
fn channel_values_accept_exactly_the_allowed_masks() {
    for kind in [TargetKind::TextChannel, TargetKind::VoiceChannel] {
        let forbidden = kind.forbidden().bits();
        for mask in masks() {
            let result = PermissionValue::new(mask, kind);
            if mask & forbidden == 0 {
                assert_eq!(result.unwrap().bits(), mask);
            } else {
                assert_eq!(
                    result,
                    Err(Error::InvalidPermissionSet {
                        kind,
                        bits: Permissions::from_raw(mask & forbidden),
                    })
                );
            }
        }
    }
}

#[test]
fn enabled_permissions_follow_the_accessors() {
    let value = PermissionValue::new(Permissions::all().bits(), TargetKind::Role).unwrap();
    let accessors = [
        value.has_create_instant_invite(),
        value.has_kick_members(),
        value.has_ban_members(),
        value.has_administrator(),
        value.has_manage_channels(),
        value.has_manage_guild(),
        value.has_add_reactions(),
        value.has_view_audit_log(),
        value.has_priority_speaker(),
        value.has_stream(),
        value.has_view_channel(),
        value.has_send_messages(),
        value.has_send_tts_messages(),
        value.has_manage_messages(),
        value.has_embed_links(),
        value.has_attach_files(),
        value.has_read_message_history(),
        value.has_mention_everyone(),
        value.has_use_external_emotes(),
        value.has_view_guild_insights(),
        value.has_connect(),
        value.has_speak(),
        value.has_mute_members(),
        value.has_deafen_members(),
        value.has_move_members(),
        value.has_use_vad(),
        value.has_change_nickname(),
        value.has_manage_nicknames(),
        value.has_manage_roles(),
        value.has_manage_webhooks(),
        value.has_manage_emojis(),
    ];
    assert!(accessors.iter().all(|&set| set));
    assert_eq!(value.enabled_permissions().len(), accessors.len());

    let none = PermissionValue::new(0, TargetKind::Role).unwrap();
    assert!(none.enabled_permissions().is_empty());
    assert!(!none.has_manage_emojis());
}

#[test]
fn overwrite_entries_cover_only_named_bits() {
    let overwrite = ChannelOverwrite::new(
        Permissions::SEND_MESSAGES.bits(),
        Permissions::EMBED_LINKS.bits(),
        TargetKind::TextChannel,
    )
    .unwrap();
    let entries = overwrite.entries();
    assert!(entries.contains(&("Send Messages", true)));
    assert!(entries.contains(&("Embed Links", false)));
    assert_eq!(entries.len(), 2);

    for (perm, label) in Permissions::all()
        .iter()
        .filter_map(|perm| perm.label().map(|label| (perm, label)))
    {
        let expected = match label {
            "Send Messages" => Some(true),
            "Embed Links" => Some(false),
            _ => None,
        };
        assert_eq!(overwrite.resolve(perm), expected, "{label}");
    }
}

#[test]
fn snowflake_components_partition_the_bits() {
    for raw in masks() {
        let id = decompose_snowflake(raw).unwrap();
        let rebuilt = (id.epoch_offset_ms() << 22)
            | (id.worker_id() << 17)
            | (id.process_id() << 12)
            | id.increment();
        assert_eq!(rebuilt, raw);
        assert!(id.worker_id() < 32 && id.process_id() < 32 && id.increment() < 4096);
        assert_eq!(id.timestamp_ms(), (raw >> 22) + 1_420_070_400_000);
    }
}

#[test]
fn decoding_is_idempotent() {
    for raw in masks() {
        assert_eq!(decode_flags(raw), decode_flags(raw));
        assert_eq!(decompose_snowflake(raw), decompose_snowflake(raw));
        assert_eq!(
            PermissionValue::new(raw, TargetKind::TextChannel),
            PermissionValue::new(raw, TargetKind::TextChannel)
        );
    }
    let text = 175_928_847_299_117_063u64.to_string();
    assert_eq!(
        text.parse::<Snowflake>().unwrap(),
        decompose_snowflake(text.as_str()).unwrap()
    );
}
