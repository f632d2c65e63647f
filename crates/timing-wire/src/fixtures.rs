//! Packet builders for tests (pub for integration tests in downstream crates).
//!
//! Each builder writes fields in wire order for the requested year and pads
//! the packet to its registered size, so unspecified fields are zero.

use crate::packets::{
    CarDamage, CarStatus, CarTelemetry, ClassificationRecord, LapEntry, Participant,
    SessionHistoryPacket, SessionPacket,
};
use crate::registry::{
    GameYear, MAX_HISTORY_LAPS, NAME_SIZE, NUM_CARS, PACKET_VERSION, PacketKind, layout_2020,
    layout_2022, layout_2023, layout_2024,
};

/// Header values a test usually cares about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderFixture {
    pub session_uid: u64,
    pub session_time: f32,
    pub frame: u32,
    pub player_car_index: u8,
}

impl Default for HeaderFixture {
    fn default() -> Self {
        Self {
            session_uid: 0x1234_5678_9abc_def0,
            session_time: 0.0,
            frame: 0,
            player_car_index: 0,
        }
    }
}

trait Put {
    fn put_u8(&mut self, v: u8);
    fn put_bytes(&mut self, v: &[u8]);
    fn put_zeros(&mut self, n: usize);

    fn put_bool(&mut self, v: bool) {
        self.put_u8(u8::from(v));
    }
    fn put_i8(&mut self, v: i8) {
        self.put_bytes(&v.to_le_bytes());
    }
    fn put_u16(&mut self, v: u16) {
        self.put_bytes(&v.to_le_bytes());
    }
    fn put_u32(&mut self, v: u32) {
        self.put_bytes(&v.to_le_bytes());
    }
    fn put_u64(&mut self, v: u64) {
        self.put_bytes(&v.to_le_bytes());
    }
    fn put_f32(&mut self, v: f32) {
        self.put_bytes(&v.to_le_bytes());
    }
    fn put_f64(&mut self, v: f64) {
        self.put_bytes(&v.to_le_bytes());
    }
    fn put_split_ms(&mut self, ms: u32) {
        self.put_u16(u16::try_from(ms % 60_000).unwrap_or(u16::MAX));
        self.put_u8(u8::try_from(ms / 60_000).unwrap_or(u8::MAX));
    }
    fn put_name(&mut self, name: &str) {
        let mut raw = [0u8; NAME_SIZE];
        for (dst, src) in raw.iter_mut().zip(name.bytes().take(NAME_SIZE - 1)) {
            *dst = src;
        }
        self.put_bytes(&raw);
    }
}

impl Put for Vec<u8> {
    fn put_u8(&mut self, v: u8) {
        self.push(v);
    }
    fn put_bytes(&mut self, v: &[u8]) {
        self.extend_from_slice(v);
    }
    fn put_zeros(&mut self, n: usize) {
        self.extend(std::iter::repeat_n(0u8, n));
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "fixture percentages are small non-negative values"
)]
fn percent_u8(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

#[expect(
    clippy::cast_precision_loss,
    reason = "fixture times are well inside f32 precision"
)]
fn ms_to_seconds(ms: u32) -> f32 {
    ms as f32 / 1000.0
}

/// Pad (or cut) `buf` to the registered size of `kind`.
fn finish(year: GameYear, kind: PacketKind, mut buf: Vec<u8>) -> Vec<u8> {
    let size = year.packet_size(kind).unwrap_or(buf.len());
    buf.resize(size, 0);
    buf
}

/// Pad the entry that started at `start` to `entry_size`.
fn close_entry(buf: &mut Vec<u8>, start: usize, entry_size: usize) {
    buf.resize(start + entry_size, 0);
}

/// Header bytes for `kind` (id `0xff` for [`PacketKind::Unknown`]).
pub fn header_bytes(year: GameYear, kind: PacketKind, h: &HeaderFixture) -> Vec<u8> {
    let mut buf = Vec::with_capacity(year.header_size());
    buf.put_u16(year.packet_format()); // 0-1
    let id = kind.id().unwrap_or(u8::MAX);
    match year {
        GameYear::Y2020 | GameYear::Y2022 => {
            buf.put_u8(1); // gameMajorVersion
            buf.put_u8(0); // gameMinorVersion
            buf.put_u8(PACKET_VERSION);
            buf.put_u8(id);
            buf.put_u64(h.session_uid);
            buf.put_f32(h.session_time);
            buf.put_u32(h.frame);
        }
        GameYear::Y2023 | GameYear::Y2024 => {
            buf.put_u8(u8::try_from(year.packet_format() % 100).unwrap_or(0)); // gameYear
            buf.put_u8(1);
            buf.put_u8(0);
            buf.put_u8(PACKET_VERSION);
            buf.put_u8(id);
            buf.put_u64(h.session_uid);
            buf.put_f32(h.session_time);
            buf.put_u32(h.frame);
            buf.put_u32(h.frame); // overallFrameIdentifier
        }
    }
    buf.put_u8(h.player_car_index);
    buf.put_u8(255); // secondaryPlayerCarIndex
    buf
}

/// Header followed by an all-zero payload of the registered size.
pub fn zeroed_packet(year: GameYear, kind: PacketKind, h: &HeaderFixture) -> Vec<u8> {
    finish(year, kind, header_bytes(year, kind, h))
}

// ── Lap ───────────────────────────────────────────────────────────────────────

const fn lap_entry_size(year: GameYear) -> usize {
    match year {
        GameYear::Y2020 => layout_2020::LAP_ENTRY,
        GameYear::Y2022 => layout_2022::LAP_ENTRY,
        GameYear::Y2023 => layout_2023::LAP_ENTRY,
        GameYear::Y2024 => layout_2024::LAP_ENTRY,
    }
}

fn put_lap_entry(buf: &mut Vec<u8>, year: GameYear, e: &LapEntry) {
    let start = buf.len();
    if year == GameYear::Y2020 {
        buf.put_f32(ms_to_seconds(e.last_lap_time_ms));
        buf.put_f32(ms_to_seconds(e.current_lap_time_ms));
        buf.put_u16(u16::try_from(e.sector1_time_ms).unwrap_or(u16::MAX));
        buf.put_u16(u16::try_from(e.sector2_time_ms).unwrap_or(u16::MAX));
        buf.put_zeros(20); // best lap / best sector block
        buf.put_f32(e.lap_distance);
        buf.put_f32(e.total_distance);
        buf.put_f32(e.safety_car_delta);
        buf.put_u8(e.car_position);
        buf.put_u8(e.current_lap_num);
        buf.put_u8(e.pit_status);
        buf.put_u8(e.sector);
        buf.put_bool(e.current_lap_invalid);
        buf.put_u8(e.penalties);
        buf.put_u8(e.grid_position);
        buf.put_u8(e.driver_status);
        buf.put_u8(e.result_status);
        close_entry(buf, start, lap_entry_size(year));
        return;
    }
    buf.put_u32(e.last_lap_time_ms);
    buf.put_u32(e.current_lap_time_ms);
    match year {
        GameYear::Y2022 => {
            buf.put_u16(u16::try_from(e.sector1_time_ms).unwrap_or(u16::MAX));
            buf.put_u16(u16::try_from(e.sector2_time_ms).unwrap_or(u16::MAX));
        }
        GameYear::Y2023 => {
            buf.put_split_ms(e.sector1_time_ms);
            buf.put_split_ms(e.sector2_time_ms);
            buf.put_u16(u16::try_from(e.delta_to_car_in_front_ms).unwrap_or(u16::MAX));
            buf.put_u16(u16::try_from(e.delta_to_race_leader_ms).unwrap_or(u16::MAX));
        }
        _ => {
            buf.put_split_ms(e.sector1_time_ms);
            buf.put_split_ms(e.sector2_time_ms);
            buf.put_split_ms(e.delta_to_car_in_front_ms);
            buf.put_split_ms(e.delta_to_race_leader_ms);
        }
    }
    buf.put_f32(e.lap_distance);
    buf.put_f32(e.total_distance);
    buf.put_f32(e.safety_car_delta);
    buf.put_u8(e.car_position);
    buf.put_u8(e.current_lap_num);
    buf.put_u8(e.pit_status);
    buf.put_u8(e.num_pit_stops);
    buf.put_u8(e.sector);
    buf.put_bool(e.current_lap_invalid);
    buf.put_u8(e.penalties);
    buf.put_u8(e.total_warnings);
    if year != GameYear::Y2022 {
        buf.put_u8(e.corner_cutting_warnings);
    }
    buf.put_u8(e.num_unserved_drive_through_pens);
    buf.put_u8(e.num_unserved_stop_go_pens);
    buf.put_u8(e.grid_position);
    buf.put_u8(e.driver_status);
    buf.put_u8(e.result_status);
    buf.put_bool(e.pit_lane_timer_active);
    buf.put_u16(e.pit_lane_time_in_lane_ms);
    buf.put_u16(e.pit_stop_timer_ms);
    buf.put_bool(e.pit_stop_should_serve_pen);
    if year == GameYear::Y2024 {
        buf.put_f32(e.speed_trap_fastest_speed);
        buf.put_u8(e.speed_trap_fastest_lap);
    }
    close_entry(buf, start, lap_entry_size(year));
}

/// Lap packet; cars beyond `cars.len()` are zeroed.
pub fn lap_packet(year: GameYear, h: &HeaderFixture, cars: &[LapEntry]) -> Vec<u8> {
    let mut buf = header_bytes(year, PacketKind::Lap, h);
    for idx in 0..NUM_CARS {
        let entry = cars.get(idx).copied().unwrap_or_default();
        put_lap_entry(&mut buf, year, &entry);
    }
    finish(year, PacketKind::Lap, buf)
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// Event packet with `details` written after the code and zero-padded.
pub fn event_packet(year: GameYear, h: &HeaderFixture, code: &[u8; 4], details: &[u8]) -> Vec<u8> {
    let mut buf = header_bytes(year, PacketKind::Event, h);
    buf.put_bytes(code);
    buf.put_bytes(details);
    finish(year, PacketKind::Event, buf)
}

/// `PENA` detail bytes.
pub fn penalty_details(
    penalty_type: u8,
    infringement_type: u8,
    vehicle_idx: u8,
    other_vehicle_idx: u8,
    time: u8,
    lap_num: u8,
    places_gained: u8,
) -> [u8; 7] {
    [
        penalty_type,
        infringement_type,
        vehicle_idx,
        other_vehicle_idx,
        time,
        lap_num,
        places_gained,
    ]
}

/// `FTLP` detail bytes.
pub fn fastest_lap_details(vehicle_idx: u8, lap_time: f32) -> Vec<u8> {
    let mut buf = vec![vehicle_idx];
    buf.put_f32(lap_time);
    buf
}

/// `BUTN` detail bytes.
pub fn button_details(button_status: u32) -> [u8; 4] {
    button_status.to_le_bytes()
}

// ── Participants ──────────────────────────────────────────────────────────────

pub fn participants_packet(
    year: GameYear,
    h: &HeaderFixture,
    num_active_cars: u8,
    participants: &[Participant],
) -> Vec<u8> {
    let entry_size = match year {
        GameYear::Y2020 => layout_2020::PARTICIPANT_ENTRY,
        GameYear::Y2022 => layout_2022::PARTICIPANT_ENTRY,
        GameYear::Y2023 => layout_2023::PARTICIPANT_ENTRY,
        GameYear::Y2024 => layout_2024::PARTICIPANT_ENTRY,
    };
    let mut buf = header_bytes(year, PacketKind::Participants, h);
    buf.put_u8(num_active_cars);
    for idx in 0..NUM_CARS {
        let start = buf.len();
        if let Some(p) = participants.get(idx) {
            buf.put_bool(p.ai_controlled);
            buf.put_u8(p.driver_id);
            if year != GameYear::Y2020 {
                buf.put_u8(p.network_id);
            }
            buf.put_u8(p.team_id);
            if year != GameYear::Y2020 {
                buf.put_bool(p.my_team);
            }
            buf.put_u8(p.race_number);
            buf.put_u8(p.nationality);
            buf.put_name(&p.name);
            buf.put_u8(p.your_telemetry);
            match year {
                GameYear::Y2020 | GameYear::Y2022 => {}
                GameYear::Y2023 => {
                    buf.put_bool(p.show_online_names);
                    buf.put_u8(p.platform);
                }
                GameYear::Y2024 => {
                    buf.put_bool(p.show_online_names);
                    buf.put_u16(p.tech_level);
                    buf.put_u8(p.platform);
                }
            }
        }
        close_entry(&mut buf, start, entry_size);
    }
    finish(year, PacketKind::Participants, buf)
}

// ── Car telemetry / status / damage ───────────────────────────────────────────

pub fn car_telemetry_packet(year: GameYear, h: &HeaderFixture, cars: &[CarTelemetry]) -> Vec<u8> {
    let entry_size = match year {
        GameYear::Y2020 => layout_2020::CAR_TELEMETRY_ENTRY,
        _ => layout_2022::CAR_TELEMETRY_ENTRY,
    };
    let mut buf = header_bytes(year, PacketKind::CarTelemetry, h);
    for idx in 0..NUM_CARS {
        let start = buf.len();
        let t = cars.get(idx).copied().unwrap_or_default();
        buf.put_u16(t.speed_kmh);
        buf.put_f32(t.throttle);
        buf.put_f32(t.steer);
        buf.put_f32(t.brake);
        buf.put_u8(t.clutch);
        buf.put_i8(t.gear);
        buf.put_u16(t.engine_rpm);
        buf.put_u8(t.drs);
        buf.put_u8(t.rev_lights_percent);
        if year != GameYear::Y2020 {
            buf.put_u16(t.rev_lights_bit_value);
        }
        for v in t.brakes_temperature {
            buf.put_u16(v);
        }
        buf.put_bytes(&t.tyres_surface_temperature);
        buf.put_bytes(&t.tyres_inner_temperature);
        buf.put_u16(t.engine_temperature);
        for v in t.tyres_pressure {
            buf.put_f32(v);
        }
        buf.put_bytes(&t.surface_type);
        close_entry(&mut buf, start, entry_size);
    }
    finish(year, PacketKind::CarTelemetry, buf)
}

pub fn car_status_packet(year: GameYear, h: &HeaderFixture, cars: &[CarStatus]) -> Vec<u8> {
    let entry_size = match year {
        GameYear::Y2020 => layout_2020::CAR_STATUS_ENTRY,
        GameYear::Y2022 => layout_2022::CAR_STATUS_ENTRY,
        _ => layout_2023::CAR_STATUS_ENTRY,
    };
    let mut buf = header_bytes(year, PacketKind::CarStatus, h);
    for idx in 0..NUM_CARS {
        let start = buf.len();
        let s = cars.get(idx).copied().unwrap_or_default();
        buf.put_u8(s.traction_control);
        buf.put_u8(s.anti_lock_brakes);
        buf.put_u8(s.fuel_mix);
        buf.put_u8(s.front_brake_bias);
        buf.put_u8(s.pit_limiter_status);
        buf.put_f32(s.fuel_in_tank);
        buf.put_f32(s.fuel_capacity);
        buf.put_f32(s.fuel_remaining_laps);
        buf.put_u16(s.max_rpm);
        buf.put_u16(s.idle_rpm);
        buf.put_u8(s.max_gears);
        buf.put_u8(s.drs_allowed);
        buf.put_u16(s.drs_activation_distance);
        if year == GameYear::Y2020 {
            let d = s.legacy_damage.unwrap_or_default();
            for w in d.tyres_wear {
                buf.put_u8(percent_u8(w));
            }
            buf.put_u8(s.actual_tyre_compound);
            buf.put_u8(s.visual_tyre_compound);
            buf.put_u8(s.tyres_age_laps);
            buf.put_bytes(&d.tyres_damage);
            buf.put_u8(d.front_left_wing_damage);
            buf.put_u8(d.front_right_wing_damage);
            buf.put_u8(d.rear_wing_damage);
            buf.put_u8(d.drs_fault);
            buf.put_u8(d.engine_damage);
            buf.put_u8(d.gear_box_damage);
            buf.put_i8(s.vehicle_fia_flags);
        } else {
            buf.put_u8(s.actual_tyre_compound);
            buf.put_u8(s.visual_tyre_compound);
            buf.put_u8(s.tyres_age_laps);
            buf.put_i8(s.vehicle_fia_flags);
            if matches!(year, GameYear::Y2023 | GameYear::Y2024) {
                buf.put_f32(s.engine_power_ice);
                buf.put_f32(s.engine_power_mguk);
            }
        }
        buf.put_f32(s.ers_store_energy);
        buf.put_u8(s.ers_deploy_mode);
        buf.put_f32(s.ers_harvested_this_lap_mguk);
        buf.put_f32(s.ers_harvested_this_lap_mguh);
        buf.put_f32(s.ers_deployed_this_lap);
        close_entry(&mut buf, start, entry_size);
    }
    finish(year, PacketKind::CarStatus, buf)
}

pub fn car_damage_packet(year: GameYear, h: &HeaderFixture, cars: &[CarDamage]) -> Vec<u8> {
    let mut buf = header_bytes(year, PacketKind::CarDamage, h);
    for idx in 0..NUM_CARS {
        let start = buf.len();
        let d = cars.get(idx).copied().unwrap_or_default();
        for w in d.tyres_wear {
            buf.put_f32(w);
        }
        buf.put_bytes(&d.tyres_damage);
        buf.put_bytes(&d.brakes_damage);
        buf.put_u8(d.front_left_wing_damage);
        buf.put_u8(d.front_right_wing_damage);
        buf.put_u8(d.rear_wing_damage);
        close_entry(&mut buf, start, layout_2022::CAR_DAMAGE_ENTRY);
    }
    finish(year, PacketKind::CarDamage, buf)
}

// ── Session / classification / history ───────────────────────────────────────

pub fn session_packet(year: GameYear, h: &HeaderFixture, s: &SessionPacket) -> Vec<u8> {
    let mut buf = header_bytes(year, PacketKind::Session, h);
    buf.put_u8(s.weather);
    buf.put_i8(s.track_temperature);
    buf.put_i8(s.air_temperature);
    buf.put_u8(s.total_laps);
    buf.put_u16(s.track_length);
    buf.put_u8(s.session_type);
    buf.put_i8(s.track_id);
    buf.put_u8(s.formula);
    buf.put_u16(s.session_time_left);
    buf.put_u16(s.session_duration);
    buf.put_u8(s.pit_speed_limit);
    buf.put_u8(s.game_paused);
    buf.put_u8(s.is_spectating);
    buf.put_u8(s.spectator_car_index);
    buf.put_u8(s.sli_pro_native_support);
    buf.put_u8(s.num_marshal_zones);
    buf.put_zeros(crate::registry::MARSHAL_ZONES * 5);
    buf.put_u8(s.safety_car_status);
    buf.put_u8(s.network_game);
    finish(year, PacketKind::Session, buf)
}

pub fn final_classification_packet(
    year: GameYear,
    h: &HeaderFixture,
    num_cars: u8,
    entries: &[ClassificationRecord],
) -> Vec<u8> {
    let entry_size = match year {
        GameYear::Y2020 => layout_2020::CLASSIFICATION_ENTRY,
        _ => layout_2022::CLASSIFICATION_ENTRY,
    };
    let mut buf = header_bytes(year, PacketKind::FinalClassification, h);
    buf.put_u8(num_cars);
    for idx in 0..NUM_CARS {
        let start = buf.len();
        let c = entries.get(idx).copied().unwrap_or_default();
        buf.put_u8(c.position);
        buf.put_u8(c.num_laps);
        buf.put_u8(c.grid_position);
        buf.put_u8(c.points);
        buf.put_u8(c.num_pit_stops);
        buf.put_u8(c.result_status);
        if year == GameYear::Y2020 {
            buf.put_f32(ms_to_seconds(c.best_lap_time_ms));
        } else {
            buf.put_u32(c.best_lap_time_ms);
        }
        buf.put_f64(c.total_race_time);
        buf.put_u8(c.penalties_time);
        buf.put_u8(c.num_penalties);
        buf.put_u8(c.num_tyre_stints);
        buf.put_bytes(&c.tyre_stints_actual);
        buf.put_bytes(&c.tyre_stints_visual);
        if year != GameYear::Y2020 {
            buf.put_bytes(&c.tyre_stints_end_laps);
        }
        close_entry(&mut buf, start, entry_size);
    }
    finish(year, PacketKind::FinalClassification, buf)
}

pub fn session_history_packet(
    year: GameYear,
    h: &HeaderFixture,
    history: &SessionHistoryPacket,
) -> Vec<u8> {
    let mut buf = header_bytes(year, PacketKind::SessionHistory, h);
    buf.put_u8(history.car_idx);
    buf.put_u8(history.num_laps);
    buf.put_u8(history.num_tyre_stints);
    buf.put_u8(history.best_lap_time_lap_num);
    buf.put_u8(history.best_sector1_lap_num);
    buf.put_u8(history.best_sector2_lap_num);
    buf.put_u8(history.best_sector3_lap_num);
    for idx in 0..MAX_HISTORY_LAPS {
        let lap = history.laps.get(idx).copied().unwrap_or_default();
        buf.put_u32(lap.lap_time_ms);
        if year == GameYear::Y2022 {
            buf.put_u16(u16::try_from(lap.sector1_time_ms).unwrap_or(u16::MAX));
            buf.put_u16(u16::try_from(lap.sector2_time_ms).unwrap_or(u16::MAX));
            buf.put_u16(u16::try_from(lap.sector3_time_ms).unwrap_or(u16::MAX));
        } else {
            buf.put_split_ms(lap.sector1_time_ms);
            buf.put_split_ms(lap.sector2_time_ms);
            buf.put_split_ms(lap.sector3_time_ms);
        }
        buf.put_u8(lap.valid_flags);
    }
    for stint in history.tyre_stints {
        buf.put_u8(stint.end_lap);
        buf.put_u8(stint.tyre_actual_compound);
        buf.put_u8(stint.tyre_visual_compound);
    }
    finish(year, PacketKind::SessionHistory, buf)
}
