//! The timing engine: applies datagrams to a fixed 22-slot roster and the
//! session state, reporting what changed.

use crate::changes::{Change, ChangeSet, DriverField, assign};
use crate::delta;
use crate::driver::{DriverSlot, DriverStatus};
use crate::event::{DecodedEvent, EventType, SessionEvent, UDP_ACTION_1, decode_event};
use crate::laps::{self, LapChanges};
use crate::names::{self, Placeholder};
use crate::session::{ClassificationEntry, SessionInfo, classification_from_packet};
use crate::status::{self, StatusInput};
use crate::store::{PacketStore, Snapshot};
use crate::wear;
use racing_timing_config::{EngineSettings, NameMappingSet};
use racing_timing_wire::appendix::{InfringementType, PenaltyType, Team, VisualTyre};
use racing_timing_wire::packets::{CarDamage, CarStatus, LapEntry, Participant};
use racing_timing_wire::{Demultiplexer, Frame, GameYear, NUM_CARS, PacketKind};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A pit-lane speeding penalty cannot be served by the stop during which it
/// was issued.
const PIT_SPEEDING_GRACE_S: f32 = 60.0;
/// 2023+ race sessions report a stale compound right after connecting.
const INITIAL_TYRE_SETTLE_S: f32 = 2.0;

/// Frame id, code and detail bytes of an applied event.
type EventFingerprint = (u32, [u8; 4], Vec<u8>);

#[derive(Debug, Clone)]
pub struct TimingEngine {
    settings: EngineSettings,
    drivers: Vec<DriverSlot>,
    session: SessionInfo,
    events: Vec<SessionEvent>,
    classification: Option<Vec<ClassificationEntry>>,
    count_drivers: u8,
    store: PacketStore,
    mappings: Option<NameMappingSet>,
    placeholder: Placeholder,
    session_uid: u64,
    session_time: f32,
    connect_time: f32,
    buttons_down: bool,
    udp_action_pending: bool,
    seen_events: HashSet<EventFingerprint>,
}

impl TimingEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            drivers: (0..NUM_CARS).map(DriverSlot::new).collect(),
            session: SessionInfo::default(),
            events: Vec::new(),
            classification: None,
            count_drivers: 0,
            store: PacketStore::default(),
            mappings: None,
            placeholder: Placeholder::Pending,
            session_uid: 0,
            session_time: 0.0,
            connect_time: 0.0,
            buttons_down: false,
            udp_action_pending: false,
            seen_events: HashSet::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn year(&self) -> GameYear {
        self.settings.game_year
    }

    /// All 22 slots, indexed by car index.
    pub fn drivers(&self) -> &[DriverSlot] {
        &self.drivers
    }

    pub fn driver(&self, car_index: usize) -> Option<&DriverSlot> {
        self.drivers.get(car_index)
    }

    /// Present cars ordered by race position.
    pub fn standings(&self) -> Vec<&DriverSlot> {
        let mut cars: Vec<&DriverSlot> = self.drivers.iter().filter(|d| d.present).collect();
        cars.sort_by_key(|d| (d.position == 0, d.position));
        cars
    }

    pub fn session(&self) -> &SessionInfo {
        &self.session
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Final results, once the game has sent them for this session.
    pub fn classification(&self) -> Option<&[ClassificationEntry]> {
        self.classification.as_deref()
    }

    /// Highest active-car count seen in a participants packet.
    pub fn count_drivers(&self) -> u8 {
        self.count_drivers
    }

    pub fn latest(&self) -> &PacketStore {
        &self.store
    }

    pub fn session_uid(&self) -> u64 {
        self.session_uid
    }

    pub fn session_time(&self) -> f32 {
        self.session_time
    }

    pub fn placeholder_name(&self) -> Option<&str> {
        self.placeholder.as_name()
    }

    pub fn name_mappings(&self) -> Option<&NameMappingSet> {
        self.mappings.as_ref()
    }

    /// Consume a pending UDP Action 1 press.
    pub fn take_udp_action(&mut self) -> bool {
        std::mem::take(&mut self.udp_action_pending)
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one UDP datagram, which may hold several packets.
    pub fn apply(&mut self, datagram: &[u8]) -> ChangeSet {
        let mut changes = ChangeSet::new();
        if datagram.len() > self.settings.max_datagram_bytes {
            warn!(
                len = datagram.len(),
                max = self.settings.max_datagram_bytes,
                "dropping oversized datagram"
            );
            return changes;
        }
        for step in Demultiplexer::new(self.settings.game_year, datagram) {
            if let Some(frame) = step.frame {
                self.apply_frame(frame, &mut changes);
            }
        }
        changes
    }

    /// Apply one decoded packet.
    pub fn apply_frame(&mut self, frame: Frame, changes: &mut ChangeSet) {
        let header = frame.header;
        let uid = header.session_uid;
        if uid != 0 && uid != self.session_uid {
            info!(old = self.session_uid, new = uid, "new session uid, resetting");
            self.reset_into(changes);
            self.session_uid = uid;
            self.connect_time = header.session_time;
        }
        self.session_time = header.session_time;

        let kind = frame.packet.kind();
        self.store.store(frame);
        match kind {
            PacketKind::Session => self.on_session(changes),
            PacketKind::Lap => self.on_lap(changes),
            PacketKind::Event => self.on_event(changes),
            PacketKind::Participants => self.on_participants(changes),
            PacketKind::CarTelemetry => self.on_car_telemetry(changes),
            PacketKind::CarStatus => self.on_car_status(changes),
            PacketKind::LobbyInfo => self.update_drivers(changes),
            PacketKind::CarDamage => self.on_car_damage(changes),
            PacketKind::FinalClassification => self.on_final_classification(changes),
            PacketKind::SessionHistory => self.on_session_history(changes),
            _ => {}
        }

        if self.placeholder == Placeholder::Pending
            && self.count_drivers > 0
            && self.session_time > self.settings.placeholder_detect_after_s
        {
            self.detect_placeholder(changes);
        }
    }

    /// Clear every driver slot and all session state in place. The session
    /// uid is kept so packets of the running session do not reset again.
    pub fn reset(&mut self) -> ChangeSet {
        let mut changes = ChangeSet::new();
        self.reset_into(&mut changes);
        changes
    }

    fn reset_into(&mut self, changes: &mut ChangeSet) {
        for driver in &mut self.drivers {
            driver.reset();
        }
        self.session.reset();
        self.events.clear();
        self.classification = None;
        self.count_drivers = 0;
        self.store.reset();
        self.placeholder = Placeholder::Pending;
        self.buttons_down = false;
        self.udp_action_pending = false;
        self.seen_events.clear();
        self.connect_time = self.session_time;
        changes.push(Change::Reset);
    }

    /// Replace the league name mappings and re-resolve every name.
    pub fn set_name_mappings(&mut self, mappings: Option<NameMappingSet>) -> ChangeSet {
        let mut changes = ChangeSet::new();
        self.mappings = mappings;
        self.refresh_all_names(&mut changes);
        changes
    }

    // ── Session ───────────────────────────────────────────────────────────────

    fn on_session(&mut self, changes: &mut ChangeSet) {
        let year = self.year();
        let changed = self.session.update(year, &self.store.session.packet);
        changes.mark(changed, Change::Session);
    }

    fn on_final_classification(&mut self, changes: &mut ChangeSet) {
        if self.classification.is_some() {
            return;
        }
        let packet = &self.store.final_classification.packet;
        if packet.num_cars == 0 {
            return;
        }
        let entries = classification_from_packet(packet);
        info!(
            cars = packet.num_cars,
            winner = ?entries.first().map(|e| e.car_index),
            "final classification received"
        );
        self.classification = Some(entries);
        changes.push(Change::ClassificationAvailable);
    }

    // ── Laps ──────────────────────────────────────────────────────────────────

    fn on_lap(&mut self, changes: &mut ChangeSet) {
        let year = self.year();
        let quali = self.session.is_qualifying_mode();
        let total_laps = self.session.total_laps;
        let corrections = matches!(year, GameYear::Y2023 | GameYear::Y2024);

        let cars = &self.store.lap.packet.cars;
        for (idx, (driver, entry)) in self.drivers.iter_mut().zip(cars).enumerate() {
            changes.mark(
                assign(&mut driver.position, entry.car_position),
                Change::Driver(idx, DriverField::Position),
            );
            let lap_changes = if quali {
                laps::update_quali_lap(driver, entry)
            } else {
                laps::update_race_lap(driver, entry, total_laps, corrections)
            };
            record_lap_changes(changes, idx, lap_changes);
        }

        if !quali {
            let leading_lap = self
                .drivers
                .iter()
                .filter(|d| d.present)
                .map(|d| d.lap_number)
                .max()
                .unwrap_or(0);
            if leading_lap > 0 {
                let shown = if total_laps > 0 {
                    leading_lap.min(total_laps)
                } else {
                    leading_lap
                };
                changes.mark(assign(&mut self.session.current_lap, shown), Change::Session);
            }
        }

        self.update_drivers(changes);
    }

    fn on_session_history(&mut self, changes: &mut ChangeSet) {
        let quali = self.session.is_qualifying_mode();
        let history = &self.store.session_history.packet;
        let idx = usize::from(history.car_idx);
        let Some(driver) = self.drivers.get_mut(idx).filter(|d| d.present) else {
            return;
        };
        let lap_changes = if quali {
            laps::apply_quali_history(driver, history)
        } else {
            laps::apply_race_history(driver, history)
        };
        record_lap_changes(changes, idx, lap_changes);
    }

    // ── Roster ────────────────────────────────────────────────────────────────

    /// Presence, gaps, tyres and status for every car from the latest lap
    /// and car-status packets.
    fn update_drivers(&mut self, changes: &mut ChangeSet) {
        let year = self.year();
        let quali = self.session.is_qualifying_mode();
        let player = self.store.lap.header.player_index();
        let lap_cars = self.store.lap.packet.cars;
        let status_cars = self.store.car_status.packet.cars;

        for (idx, (driver, entry)) in self.drivers.iter_mut().zip(&lap_cars).enumerate() {
            if !driver.present && status::is_present(year, entry.result_status) {
                driver.present = true;
                changes.push(Change::Driver(idx, DriverField::Presence));
            }
        }

        let leader = self.drivers.iter().position(|d| d.position == 1);
        if let Some((idx, driver)) = leader.and_then(|l| self.drivers.get_mut(l).map(|d| (l, d))) {
            changes.mark(
                assign(&mut driver.delta_to_leader, 0.0),
                Change::Driver(idx, DriverField::Delta),
            );
        }

        if player != Some(0)
            && let Some(first) = self.drivers.first_mut()
        {
            changes.mark(
                assign(&mut first.is_player, false),
                Change::Driver(0, DriverField::Identity),
            );
        }
        if let Some(p) = player {
            let Some(me) = self.drivers.get_mut(p) else {
                return;
            };
            changes.mark(assign(&mut me.is_player, true), Change::Driver(p, DriverField::Identity));
            changes.mark(
                assign(&mut me.delta_to_player, 0.0),
                Change::Driver(p, DriverField::Delta),
            );
            if me.lap_number == 0 {
                return;
            }
        }

        for (idx, (entry, car_status)) in lap_cars.iter().zip(&status_cars).enumerate() {
            if !self.drivers.get(idx).is_some_and(|d| d.present) {
                continue;
            }
            self.update_gaps(idx, entry, player, leader, quali, changes);
            self.update_car(idx, entry, car_status, quali, changes);
        }
    }

    fn update_gaps(
        &mut self,
        idx: usize,
        entry: &LapEntry,
        player: Option<usize>,
        leader: Option<usize>,
        quali: bool,
        changes: &mut ChangeSet,
    ) {
        let year = self.year();
        let Some(driver) = self.drivers.get_mut(idx) else {
            return;
        };
        driver.location_on_track = entry.lap_distance;
        // Retired and disqualified cars keep the zeroed gap from `update_car`.
        if driver.status.is_terminal() {
            return;
        }

        match player {
            Some(p) if p != idx => {
                let next = match (self.drivers.get(p), self.drivers.get(idx)) {
                    (Some(me), Some(them)) if quali => Some(delta::quali_delta_to_player(me, them)),
                    (Some(me), Some(them)) => delta::race_delta_to_player(me, them, entry.penalties),
                    _ => None,
                };
                if let (Some(next), Some(driver)) = (next, self.drivers.get_mut(idx))
                    && delta::differs(next, driver.delta_to_player)
                {
                    driver.last_delta_to_player = driver.delta_to_player;
                    driver.delta_to_player = next;
                    changes.push(Change::Driver(idx, DriverField::Delta));
                }
            }
            Some(_) => {}
            None => {
                if let Some(driver) = self.drivers.get_mut(idx) {
                    let mut changed = assign(&mut driver.delta_to_player, 0.0);
                    changed |= assign(&mut driver.last_delta_to_player, 0.0);
                    changes.mark(changed, Change::Driver(idx, DriverField::Delta));
                }
            }
        }

        let Some(l) = leader.filter(|l| *l != idx) else {
            return;
        };
        let next = match (self.drivers.get(l), self.drivers.get(idx)) {
            (Some(first), Some(them)) if quali => delta::quali_delta_to_leader(first, them),
            (Some(first), Some(them)) => {
                delta::race_delta_to_leader(year, first, them, entry.delta_to_race_leader_ms)
            }
            _ => None,
        };
        if let (Some(next), Some(driver)) = (next, self.drivers.get_mut(idx))
            && delta::differs(next, driver.delta_to_leader)
        {
            driver.delta_to_leader = next;
            changes.push(Change::Driver(idx, DriverField::Delta));
        }
    }

    fn update_car(
        &mut self,
        idx: usize,
        entry: &LapEntry,
        car_status: &CarStatus,
        quali: bool,
        changes: &mut ChangeSet,
    ) {
        let year = self.year();
        let since_connect = self.session_time - self.connect_time;
        let session_time = self.session_time;
        let last_penalty_retired = self.last_pit_penalty(idx) == Some(PenaltyType::Retired);
        let Some(driver) = self.drivers.get_mut(idx) else {
            return;
        };

        changes.mark(
            assign(&mut driver.penalty_seconds, entry.penalties),
            Change::Driver(idx, DriverField::Penalties),
        );

        let mut tyres = assign(&mut driver.tyre, car_status.actual_tyre_compound);
        tyres |= assign(
            &mut driver.visual_tyre,
            VisualTyre::from_raw(car_status.visual_tyre_compound),
        );
        if driver.visual_tyres.is_empty() && driver.visual_tyre != VisualTyre::Unknown {
            match year {
                GameYear::Y2023 | GameYear::Y2024 => {
                    if !quali && since_connect > INITIAL_TYRE_SETTLE_S {
                        // Joined after a stop we never saw.
                        if driver.lap_number > 1
                            && driver.lap_number.saturating_sub(driver.tyre_age) > 1
                        {
                            driver.visual_tyres.push(VisualTyre::Unknown);
                        }
                        driver.visual_tyres.push(driver.visual_tyre);
                        tyres = true;
                    }
                }
                GameYear::Y2020 | GameYear::Y2022 => {
                    driver.visual_tyres.push(driver.visual_tyre);
                    tyres = true;
                }
            }
        }
        tyres |= assign(&mut driver.tyre_age, car_status.tyres_age_laps);

        let previous = driver.status;
        let input = StatusInput {
            result_status: entry.result_status,
            pit_status: entry.pit_status,
            driver_status: entry.driver_status,
        };
        let next = status::next_status(year, previous, input, last_penalty_retired);
        if next.pitting {
            driver.has_pitted = true;
        }
        changes.mark(
            assign(&mut driver.status, next.status),
            Change::Driver(idx, DriverField::Status),
        );
        if next.status.is_terminal() {
            changes.mark(
                assign(&mut driver.delta_to_player, 0.0),
                Change::Driver(idx, DriverField::Delta),
            );
        }

        // Qualifying runs change tyres in the garage; races in the pit box.
        let new_stint = if quali && matches!(year, GameYear::Y2023 | GameYear::Y2024) {
            previous != DriverStatus::OutLap && next.status == DriverStatus::OutLap
        } else {
            previous == DriverStatus::Pitting && next.status != DriverStatus::Pitting
        };
        if new_stint && driver.visual_tyre != VisualTyre::Unknown {
            driver.visual_tyres.push(driver.visual_tyre);
            tyres = true;
        }
        changes.mark(tyres, Change::Driver(idx, DriverField::Tyres));

        if status::is_pit_exit(year, previous, next.status) {
            let stopped = std::mem::take(&mut driver.has_pitted);
            if let Some(event) =
                serve_pit_penalty(&mut self.events, &driver.pit_penalties, stopped, session_time)
            {
                debug!(car = idx, event, stopped, "penalty served");
                changes.push(Change::Driver(idx, DriverField::Penalties));
            }
        }
    }

    fn last_pit_penalty(&self, idx: usize) -> Option<PenaltyType> {
        let event = *self.drivers.get(idx)?.pit_penalties.last()?;
        self.events
            .get(event)?
            .penalty()
            .map(|p| p.penalty_type)
    }

    // ── Events ────────────────────────────────────────────────────────────────

    fn on_event(&mut self, changes: &mut ChangeSet) {
        let Snapshot { header, packet } = self.store.event;
        match decode_event(&packet, self.session_time) {
            DecodedEvent::Ignored => {}
            DecodedEvent::Buttons(bits) => self.on_buttons(bits, changes),
            DecodedEvent::Session(event) => {
                let fingerprint = (header.frame_identifier, packet.code, packet.details.to_vec());
                if self.seen_events.contains(&fingerprint) {
                    debug!(code = %packet.code_str(), frame = header.frame_identifier, "replayed event skipped");
                } else {
                    if event.event_type == EventType::SessionStarted {
                        info!("session started event, resetting");
                        self.reset_into(changes);
                        self.store.event = Snapshot { header, packet };
                    }
                    self.seen_events.insert(fingerprint);
                    self.push_event(event, changes);
                }
            }
        }
        // Consumed; a later poll of the store must not re-emit it.
        self.store.event.packet.code = [0; 4];
    }

    fn on_buttons(&mut self, bits: u32, changes: &mut ChangeSet) {
        let down = bits & UDP_ACTION_1 != 0;
        if down && !self.buttons_down {
            self.udp_action_pending = true;
            changes.push(Change::UdpAction);
        }
        self.buttons_down = down;
    }

    fn push_event(&mut self, event: SessionEvent, changes: &mut ChangeSet) {
        let index = self.events.len();
        match event.event_type {
            EventType::SessionEnded => {
                changes.mark(assign(&mut self.session.finished, true), Change::Session);
            }
            EventType::PenaltyIssued => {
                let car = usize::from(event.car_index);
                if let (Some(penalty), Some(driver)) = (event.penalty(), self.drivers.get_mut(car)) {
                    if penalty.lap_num < 100 {
                        let lap_idx = usize::from(penalty.lap_num.saturating_sub(1));
                        if let Some(lap) = driver.laps.get_mut(lap_idx) {
                            lap.incidents.push(index);
                            changes.push(Change::Driver(car, DriverField::Laps));
                        }
                    }
                    if penalty.penalty_type.is_servable_in_pits() {
                        driver.pit_penalties.push(index);
                    }
                    changes.push(Change::Driver(car, DriverField::Penalties));
                }
            }
            _ => {}
        }
        self.events.push(event);
        changes.push(Change::EventAppended(index));
    }

    // ── Participants and names ────────────────────────────────────────────────

    fn on_participants(&mut self, changes: &mut ChangeSet) {
        let year = self.year();
        let packet = &self.store.participants.packet;
        let count = self.count_drivers.max(packet.num_active_cars);
        changes.mark(assign(&mut self.count_drivers, count), Change::Session);
        for (idx, (driver, participant)) in
            self.drivers.iter_mut().zip(&packet.participants).enumerate()
        {
            let mut identity = assign(&mut driver.team, Team::from_id(participant.team_id));
            identity |= assign(&mut driver.race_number, participant.race_number);
            changes.mark(identity, Change::Driver(idx, DriverField::Identity));
            if driver.telemetry_name.is_empty() && participant.race_number != 0 {
                apply_name(
                    driver,
                    participant,
                    year,
                    self.mappings.as_ref(),
                    &self.placeholder,
                    changes,
                );
            }
        }
    }

    fn refresh_all_names(&mut self, changes: &mut ChangeSet) {
        let year = self.year();
        let packet = &self.store.participants.packet;
        for (driver, participant) in self.drivers.iter_mut().zip(&packet.participants) {
            if participant.race_number == 0 && participant.name.is_empty() {
                continue;
            }
            apply_name(
                driver,
                participant,
                year,
                self.mappings.as_ref(),
                &self.placeholder,
                changes,
            );
        }
    }

    fn detect_placeholder(&mut self, changes: &mut ChangeSet) {
        let found = names::detect_placeholder(
            self.drivers
                .iter()
                .filter(|d| d.present)
                .map(|d| d.telemetry_name.as_str()),
        );
        self.placeholder = match found {
            Some(name) => {
                info!(placeholder = %name, "multiplayer placeholder name detected");
                Placeholder::Name(name)
            }
            None => Placeholder::Unmatched,
        };
        self.refresh_all_names(changes);
    }

    // ── Car telemetry and damage ──────────────────────────────────────────────

    fn on_car_telemetry(&mut self, changes: &mut ChangeSet) {
        let cars = &self.store.car_telemetry.packet.cars;
        for (idx, (driver, telemetry)) in self.drivers.iter_mut().zip(cars).enumerate() {
            if !driver.present {
                continue;
            }
            let before = driver.wear;
            driver.wear.apply_telemetry(telemetry);
            changes.mark(driver.wear != before, Change::Driver(idx, DriverField::Wear));
        }
        self.update_tyre_damage(changes);
    }

    fn on_car_damage(&mut self, changes: &mut ChangeSet) {
        self.update_car_damage(changes);
        self.update_tyre_damage(changes);
    }

    fn on_car_status(&mut self, changes: &mut ChangeSet) {
        // 2020 has no damage packet; its car status carries the damage block.
        if self.year() == GameYear::Y2020 {
            self.update_car_damage(changes);
            self.update_tyre_damage(changes);
        }
        self.update_drivers(changes);
    }

    fn damage_of(&self, idx: usize) -> Option<CarDamage> {
        match self.year() {
            GameYear::Y2020 => self.store.car_status.packet.cars.get(idx)?.legacy_damage,
            _ => self.store.car_damage.packet.cars.get(idx).copied(),
        }
    }

    fn update_car_damage(&mut self, changes: &mut ChangeSet) {
        for idx in 0..self.drivers.len() {
            let Some(damage) = self.damage_of(idx) else {
                continue;
            };
            let Some(driver) = self.drivers.get_mut(idx).filter(|d| d.present) else {
                continue;
            };
            let before = driver.wear;
            driver.wear.apply_damage(&damage);
            changes.mark(driver.wear != before, Change::Driver(idx, DriverField::Wear));
            changes.mark(
                assign(&mut driver.car_damage, wear::car_damage(&damage)),
                Change::Driver(idx, DriverField::Damage),
            );
        }
    }

    fn update_tyre_damage(&mut self, changes: &mut ChangeSet) {
        for idx in 0..self.drivers.len() {
            let Some(damage) = self.damage_of(idx) else {
                continue;
            };
            let Some(driver) = self.drivers.get_mut(idx).filter(|d| d.present) else {
                continue;
            };
            changes.mark(
                assign(&mut driver.tyre_damage, wear::tyre_damage(damage.tyres_wear)),
                Change::Driver(idx, DriverField::Damage),
            );
        }
    }
}

fn record_lap_changes(changes: &mut ChangeSet, idx: usize, lap_changes: LapChanges) {
    changes.mark(lap_changes.laps, Change::Driver(idx, DriverField::Laps));
    changes.mark(lap_changes.fastest, Change::Driver(idx, DriverField::FastestLap));
}

fn apply_name(
    driver: &mut DriverSlot,
    participant: &Participant,
    year: GameYear,
    mappings: Option<&NameMappingSet>,
    placeholder: &Placeholder,
    changes: &mut ChangeSet,
) {
    let resolved = names::resolve(year, mappings, placeholder, participant);
    let mut changed = assign(&mut driver.telemetry_name, participant.name.clone());
    changed |= assign(&mut driver.name, resolved.name);
    changed |= assign(&mut driver.mapped_name, resolved.mapped_name);
    changed |= assign(&mut driver.tag, resolved.tag);
    changes.mark(changed, Change::Driver(driver.id, DriverField::Name));
}

/// Mark the first penalty this pit visit discharges as served.
///
/// Leaving the pit lane without stopping serves a drive-through; a stop
/// serves anything else, except a pit-lane speeding penalty issued during
/// the same visit.
fn serve_pit_penalty(
    events: &mut [SessionEvent],
    penalties: &[usize],
    stopped: bool,
    now: f32,
) -> Option<usize> {
    for &index in penalties {
        let Some(event) = events.get_mut(index) else {
            continue;
        };
        let issued = event.time;
        let Some(penalty) = event.penalty_mut() else {
            continue;
        };
        if penalty.served {
            continue;
        }
        let drive_through = penalty.penalty_type == PenaltyType::DriveThrough;
        if drive_through == stopped {
            continue;
        }
        if stopped
            && penalty.infringement_type == InfringementType::PitLaneSpeeding
            && now - issued <= PIT_SPEEDING_GRACE_S
        {
            continue;
        }
        penalty.served = true;
        return Some(index);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventDetail, PenaltyDetails};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn penalty(time: f32, penalty_type: PenaltyType, infringement_type: InfringementType) -> SessionEvent {
        SessionEvent {
            time,
            event_type: EventType::PenaltyIssued,
            car_index: 0,
            detail: EventDetail::Penalty(PenaltyDetails {
                penalty_type,
                infringement_type,
                other_vehicle_idx: 255,
                time: 0,
                lap_num: 1,
                places_gained: 0,
                served: false,
            }),
        }
    }

    fn served(event: Option<&SessionEvent>) -> bool {
        event.and_then(SessionEvent::penalty).is_some_and(|p| p.served)
    }

    #[test]
    fn drive_through_needs_no_stop() {
        let mut events = vec![
            penalty(10.0, PenaltyType::StopGo, InfringementType::BigCollision),
            penalty(20.0, PenaltyType::DriveThrough, InfringementType::CornerCuttingGainedTime),
        ];
        assert_eq!(serve_pit_penalty(&mut events, &[0, 1], false, 100.0), Some(1));
        assert!(served(events.get(1)));
        assert!(!served(events.first()));
        assert_eq!(serve_pit_penalty(&mut events, &[0, 1], false, 100.0), None);
    }

    #[test]
    fn stop_serves_stop_go() {
        let mut events = vec![
            penalty(10.0, PenaltyType::DriveThrough, InfringementType::BigCollision),
            penalty(20.0, PenaltyType::StopGo, InfringementType::BigCollision),
        ];
        assert_eq!(serve_pit_penalty(&mut events, &[0, 1], true, 100.0), Some(1));
    }

    #[test]
    fn fresh_speeding_penalty_waits_for_next_visit() {
        let mut events = vec![
            penalty(90.0, PenaltyType::StopGo, InfringementType::PitLaneSpeeding),
            penalty(20.0, PenaltyType::StopGo, InfringementType::BigCollision),
        ];
        assert_eq!(serve_pit_penalty(&mut events, &[0, 1], true, 100.0), Some(1));
        assert_eq!(serve_pit_penalty(&mut events, &[0, 1], true, 200.0), Some(0));
    }

    #[test]
    fn new_engine_has_full_roster() -> TestResult {
        let engine = TimingEngine::new(EngineSettings::default());
        assert_eq!(engine.drivers().len(), NUM_CARS);
        let last = engine.driver(NUM_CARS - 1).ok_or("last slot")?;
        assert_eq!(last.id, NUM_CARS - 1);
        assert!(engine.standings().is_empty());
        assert!(engine.classification().is_none());
        Ok(())
    }

    #[test]
    fn oversized_datagram_is_dropped() {
        let settings = EngineSettings {
            max_datagram_bytes: 16,
            ..EngineSettings::default()
        };
        let mut engine = TimingEngine::new(settings);
        assert!(engine.apply(&[0u8; 17]).is_empty());
    }

    #[test]
    fn reset_reports_reset_token() {
        let mut engine = TimingEngine::new(EngineSettings::default());
        let changes = engine.reset();
        assert!(changes.contains(&Change::Reset));
    }
}
