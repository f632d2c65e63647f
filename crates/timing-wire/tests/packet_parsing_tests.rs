//! Integration tests for `racing-timing-wire`.
//!
//! Packets are built with the `fixtures` builders for each generation and
//! pushed through the public demultiplexer.

use racing_timing_wire::fixtures::{
    HeaderFixture, car_damage_packet, car_status_packet, event_packet,
    final_classification_packet, header_bytes, lap_packet, participants_packet, penalty_details,
    session_history_packet, session_packet, zeroed_packet,
};
use racing_timing_wire::packets::{
    CarDamage, CarStatus, ClassificationRecord, LapEntry, LapHistory, Participant,
    SessionHistoryPacket, SessionPacket,
};
use racing_timing_wire::{GameYear, Packet, PacketKind, decode, parse_header};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn decode_one(year: GameYear, buf: &[u8]) -> Result<Packet, Box<dyn std::error::Error>> {
    let out = decode(year, buf);
    assert_eq!(out.consumed, buf.len(), "{year}: consumed");
    let frame = out
        .frame
        .ok_or_else(|| format!("{year}: nothing decoded ({:?})", out.skipped))?;
    Ok(frame.packet)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ── Header ────────────────────────────────────────────────────────────────────

#[test]
fn header_2024_carries_year_and_overall_frame() -> TestResult {
    let h = HeaderFixture {
        session_uid: 42,
        session_time: 12.5,
        frame: 900,
        player_car_index: 3,
    };
    let raw = header_bytes(GameYear::Y2024, PacketKind::Lap, &h);
    assert_eq!(raw.len(), 29);
    let header = parse_header(&raw, GameYear::Y2024)?;
    assert_eq!(header.packet_format, 2024);
    assert_eq!(header.game_year, 24);
    assert_eq!(header.packet_id, 2);
    assert_eq!(header.session_uid, 42);
    assert!(close(f64::from(header.session_time), 12.5));
    assert_eq!(header.frame_identifier, 900);
    assert_eq!(header.overall_frame_identifier, 900);
    assert_eq!(header.player_index(), Some(3));
    Ok(())
}

#[test]
fn header_2020_mirrors_frame_into_overall_frame() -> TestResult {
    let h = HeaderFixture {
        frame: 77,
        player_car_index: 255,
        ..HeaderFixture::default()
    };
    let raw = header_bytes(GameYear::Y2020, PacketKind::Session, &h);
    assert_eq!(raw.len(), 24);
    let header = parse_header(&raw, GameYear::Y2020)?;
    assert_eq!(header.game_year, 0);
    assert_eq!(header.overall_frame_identifier, 77);
    assert_eq!(header.player_index(), None, "spectator index is not a slot");
    Ok(())
}

// ── Lap ───────────────────────────────────────────────────────────────────────

#[test]
fn lap_2020_seconds_are_normalised_to_milliseconds() -> TestResult {
    let entry = LapEntry {
        last_lap_time_ms: 90_000,
        current_lap_time_ms: 12_345,
        sector1_time_ms: 30_000,
        sector2_time_ms: 30_500,
        car_position: 2,
        current_lap_num: 3,
        sector: 2,
        driver_status: 4,
        result_status: 2,
        ..LapEntry::default()
    };
    let buf = lap_packet(GameYear::Y2020, &HeaderFixture::default(), &[entry]);
    let Packet::Lap(lap) = decode_one(GameYear::Y2020, &buf)? else {
        return Err("expected a lap packet".into());
    };
    assert_eq!(lap.cars[0], entry);
    assert_eq!(lap.cars[1], LapEntry::default());
    Ok(())
}

#[test]
fn lap_2023_joins_minutes_into_sector_times() -> TestResult {
    let entry = LapEntry {
        last_lap_time_ms: 95_000,
        sector1_time_ms: 65_123,
        sector2_time_ms: 29_999,
        delta_to_car_in_front_ms: 1_250,
        delta_to_race_leader_ms: 4_100,
        current_lap_num: 7,
        corner_cutting_warnings: 2,
        pit_lane_time_in_lane_ms: 18_000,
        ..LapEntry::default()
    };
    let buf = lap_packet(GameYear::Y2023, &HeaderFixture::default(), &[entry]);
    let Packet::Lap(lap) = decode_one(GameYear::Y2023, &buf)? else {
        return Err("expected a lap packet".into());
    };
    assert_eq!(lap.cars[0].sector1_time_ms, 65_123);
    assert_eq!(lap.cars[0], entry);
    Ok(())
}

#[test]
fn lap_2024_reads_speed_trap_fields() -> TestResult {
    let entry = LapEntry {
        delta_to_race_leader_ms: 125_500,
        speed_trap_fastest_speed: 331.5,
        speed_trap_fastest_lap: 4,
        current_lap_num: 5,
        ..LapEntry::default()
    };
    let cars = vec![LapEntry::default(), entry];
    let buf = lap_packet(GameYear::Y2024, &HeaderFixture::default(), &cars);
    let Packet::Lap(lap) = decode_one(GameYear::Y2024, &buf)? else {
        return Err("expected a lap packet".into());
    };
    assert_eq!(lap.cars[1].delta_to_race_leader_ms, 125_500);
    assert!(close(f64::from(lap.cars[1].speed_trap_fastest_speed), 331.5));
    assert_eq!(lap.cars[1].speed_trap_fastest_lap, 4);
    Ok(())
}

#[test]
fn lap_2022_has_no_corner_cutting_byte() -> TestResult {
    let entry = LapEntry {
        total_warnings: 3,
        num_unserved_drive_through_pens: 1,
        grid_position: 9,
        result_status: 3,
        ..LapEntry::default()
    };
    let buf = lap_packet(GameYear::Y2022, &HeaderFixture::default(), &[entry]);
    let Packet::Lap(lap) = decode_one(GameYear::Y2022, &buf)? else {
        return Err("expected a lap packet".into());
    };
    assert_eq!(lap.cars[0].num_unserved_drive_through_pens, 1);
    assert_eq!(lap.cars[0].grid_position, 9);
    assert_eq!(lap.cars[0].result_status, 3);
    Ok(())
}

// ── Event ─────────────────────────────────────────────────────────────────────

#[test]
fn penalty_event_2020_uses_seven_detail_bytes() -> TestResult {
    let details = penalty_details(4, 17, 5, 255, 10, 3, 0);
    let buf = event_packet(GameYear::Y2020, &HeaderFixture::default(), b"PENA", &details);
    let Packet::Event(event) = decode_one(GameYear::Y2020, &buf)? else {
        return Err("expected an event packet".into());
    };
    assert_eq!(event.code_str(), "PENA");
    assert_eq!(event.details, [4, 17, 5, 255, 10, 3, 0, 0, 0, 0, 0, 0]);
    Ok(())
}

#[test]
fn event_2023_keeps_full_detail_union() -> TestResult {
    let details = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
    let buf = event_packet(GameYear::Y2023, &HeaderFixture::default(), b"SPTP", &details);
    assert_eq!(buf.len(), 45);
    let Packet::Event(event) = decode_one(GameYear::Y2023, &buf)? else {
        return Err("expected an event packet".into());
    };
    assert_eq!(event.details, details);
    assert!(!event.is_empty());
    Ok(())
}

// ── Participants ──────────────────────────────────────────────────────────────

#[test]
fn participants_2023_read_online_name_flag() -> TestResult {
    let player = Participant {
        driver_id: 255,
        team_id: 2,
        race_number: 44,
        name: "Player".to_string(),
        your_telemetry: 1,
        show_online_names: false,
        platform: 3,
        ..Participant::default()
    };
    let buf = participants_packet(GameYear::Y2023, &HeaderFixture::default(), 1, &[player.clone()]);
    let Packet::Participants(p) = decode_one(GameYear::Y2023, &buf)? else {
        return Err("expected a participants packet".into());
    };
    assert_eq!(p.num_active_cars, 1);
    assert_eq!(p.participants[0], player);
    Ok(())
}

#[test]
fn participants_2020_default_to_showing_names() -> TestResult {
    let driver = Participant {
        ai_controlled: true,
        driver_id: 9,
        team_id: 1,
        race_number: 16,
        name: "LECLERC".to_string(),
        ..Participant::default()
    };
    let buf = participants_packet(GameYear::Y2020, &HeaderFixture::default(), 20, &[driver]);
    assert_eq!(buf.len(), 1213);
    let Packet::Participants(p) = decode_one(GameYear::Y2020, &buf)? else {
        return Err("expected a participants packet".into());
    };
    assert_eq!(p.participants[0].name, "LECLERC");
    assert!(p.participants[0].show_online_names);
    assert_eq!(p.participants[0].race_number, 16);
    assert_eq!(p.participants[1].name, "");
    Ok(())
}

// ── Car status / damage ───────────────────────────────────────────────────────

#[test]
fn car_status_2020_lifts_embedded_damage() -> TestResult {
    let status = CarStatus {
        actual_tyre_compound: 16,
        visual_tyre_compound: 16,
        tyres_age_laps: 4,
        legacy_damage: Some(CarDamage {
            tyres_wear: [10.0, 20.0, 30.0, 40.0],
            front_left_wing_damage: 15,
            rear_wing_damage: 5,
            ..CarDamage::default()
        }),
        ..CarStatus::default()
    };
    let buf = car_status_packet(GameYear::Y2020, &HeaderFixture::default(), &[status]);
    let Packet::CarStatus(s) = decode_one(GameYear::Y2020, &buf)? else {
        return Err("expected a car status packet".into());
    };
    let car = s.cars[0];
    assert_eq!(car.visual_tyre_compound, 16);
    assert_eq!(car.tyres_age_laps, 4);
    let damage = car.legacy_damage.ok_or("2020 status must carry damage")?;
    assert!(close(f64::from(damage.tyres_wear[3]), 40.0));
    assert_eq!(damage.front_left_wing_damage, 15);
    assert_eq!(damage.rear_wing_damage, 5);
    Ok(())
}

#[test]
fn car_status_2023_has_no_legacy_damage() -> TestResult {
    let status = CarStatus {
        visual_tyre_compound: 17,
        tyres_age_laps: 12,
        engine_power_ice: 550_000.0,
        ..CarStatus::default()
    };
    let buf = car_status_packet(GameYear::Y2023, &HeaderFixture::default(), &[status]);
    let Packet::CarStatus(s) = decode_one(GameYear::Y2023, &buf)? else {
        return Err("expected a car status packet".into());
    };
    assert_eq!(s.cars[0].legacy_damage, None);
    assert_eq!(s.cars[0].tyres_age_laps, 12);
    assert!(close(f64::from(s.cars[0].engine_power_ice), 550_000.0));
    Ok(())
}

#[test]
fn car_damage_reads_wings_and_wear() -> TestResult {
    let damage = CarDamage {
        tyres_wear: [1.5, 2.5, 3.5, 4.5],
        front_left_wing_damage: 30,
        front_right_wing_damage: 20,
        rear_wing_damage: 10,
        ..CarDamage::default()
    };
    let buf = car_damage_packet(GameYear::Y2022, &HeaderFixture::default(), &[damage]);
    let Packet::CarDamage(d) = decode_one(GameYear::Y2022, &buf)? else {
        return Err("expected a car damage packet".into());
    };
    assert_eq!(d.cars[0], damage);
    Ok(())
}

// ── Session / classification / history ───────────────────────────────────────

#[test]
fn session_prefix_decodes_for_every_year() -> TestResult {
    let session = SessionPacket {
        total_laps: 58,
        track_length: 5_303,
        session_type: 10,
        track_id: 11,
        session_time_left: 3_600,
        safety_car_status: 1,
        network_game: 1,
        ..SessionPacket::default()
    };
    for year in GameYear::ALL {
        let buf = session_packet(year, &HeaderFixture::default(), &session);
        let Packet::Session(s) = decode_one(year, &buf)? else {
            return Err("expected a session packet".into());
        };
        assert_eq!(s, session, "{year}");
    }
    Ok(())
}

#[test]
fn classification_2020_best_lap_is_seconds_on_the_wire() -> TestResult {
    let record = ClassificationRecord {
        position: 1,
        num_laps: 58,
        grid_position: 2,
        points: 25,
        num_pit_stops: 1,
        result_status: 3,
        best_lap_time_ms: 83_456,
        total_race_time: 5_400.25,
        penalties_time: 5,
        num_penalties: 1,
        ..ClassificationRecord::default()
    };
    let buf = final_classification_packet(GameYear::Y2020, &HeaderFixture::default(), 20, &[record]);
    let Packet::FinalClassification(c) = decode_one(GameYear::Y2020, &buf)? else {
        return Err("expected a classification packet".into());
    };
    assert_eq!(c.num_cars, 20);
    assert_eq!(c.entries[0].best_lap_time_ms, 83_456);
    assert!(close(c.entries[0].total_race_time, 5_400.25));
    assert_eq!(c.entries[0].points, 25);
    Ok(())
}

#[test]
fn session_history_2024_reads_split_sector_times() -> TestResult {
    let mut history = SessionHistoryPacket {
        car_idx: 3,
        num_laps: 2,
        best_lap_time_lap_num: 2,
        ..SessionHistoryPacket::default()
    };
    if let Some(lap) = history.laps.get_mut(1) {
        *lap = LapHistory {
            lap_time_ms: 91_234,
            sector1_time_ms: 61_000,
            sector2_time_ms: 15_000,
            sector3_time_ms: 15_234,
            valid_flags: 0x0F,
        };
    }
    let buf = session_history_packet(GameYear::Y2024, &HeaderFixture::default(), &history);
    let Packet::SessionHistory(h) = decode_one(GameYear::Y2024, &buf)? else {
        return Err("expected a session history packet".into());
    };
    assert_eq!(h.car_idx, 3);
    assert_eq!(h.laps.len(), 100);
    let lap = h.laps.get(1).ok_or("missing lap 2")?;
    assert_eq!(lap.sector1_time_ms, 61_000);
    assert!(lap.is_fully_valid());
    Ok(())
}

#[test]
fn zeroed_packets_are_registry_sized() {
    for year in GameYear::ALL {
        for kind in year.packet_kinds() {
            let buf = zeroed_packet(year, kind, &HeaderFixture::default());
            assert_eq!(Some(buf.len()), year.packet_size(kind), "{year} {kind:?}");
        }
    }
}
