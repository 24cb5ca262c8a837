use chrono::NaiveDateTime;
use tracing::debug;

use super::{
    DefinitionError, EncounterDefinition, EncounterState, MAX_PHASE, PullRecord, SegmentError,
};
use crate::combat_log::{LogEvent, SourcedLine};

/// Folds an ordered stream of log lines into pull records.
///
/// One segmenter covers one run: its state carries across file boundaries
/// and is never shared. Feed it a fresh stream to start over.
#[derive(Debug, Clone)]
pub struct PullSegmenter {
    definition: EncounterDefinition,
    state: EncounterState,
    pulls_emitted: u32,
}

impl PullSegmenter {
    /// Build a segmenter for a definition, rejecting it if `validate` fails.
    pub fn new(definition: EncounterDefinition) -> Result<Self, DefinitionError> {
        definition.validate()?;
        Ok(Self {
            definition,
            state: EncounterState::Idle,
            pulls_emitted: 0,
        })
    }

    pub fn definition(&self) -> &EncounterDefinition {
        &self.definition
    }

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn pulls_emitted(&self) -> u32 {
        self.pulls_emitted
    }

    /// Advance the state machine by one line.
    ///
    /// Returns the pull closed by this line, if it qualified.
    pub fn process(&mut self, record: &SourcedLine) -> Result<Option<PullRecord>, SegmentError> {
        match &record.line.event {
            LogEvent::Ability {
                source_name,
                target_name,
                ..
            } => {
                if !self.state.is_in_progress()
                    && self.definition.is_start_trigger(source_name, target_name)
                {
                    let start_time = timestamp_of(record)?;
                    debug!(
                        %start_time,
                        file = %record.source_file,
                        line = record.line.line_number,
                        "Pull started"
                    );
                    self.state = EncounterState::InProgress {
                        start_time,
                        phase: 1,
                    };
                }
                self.check_phase_gate(target_name);
                Ok(None)
            }
            LogEvent::ChangeZone { zone_name, .. }
                if self.state.is_in_progress() && self.definition.is_encounter_zone(zone_name) =>
            {
                debug!(
                    file = %record.source_file,
                    line = record.line.line_number,
                    "Encounter zone re-entered mid pull, discarding attempt"
                );
                self.state = EncounterState::Idle;
                Ok(None)
            }
            LogEvent::Director { command, .. }
                if self.state.is_in_progress() && self.definition.is_wipe(command) =>
            {
                self.close(record)
            }
            _ => Ok(None),
        }
    }

    /// Wrap a line stream into a lazy iterator of pulls.
    pub fn pulls<I>(self, records: I) -> Pulls<I::IntoIter>
    where
        I: IntoIterator<Item = SourcedLine>,
    {
        Pulls {
            segmenter: self,
            records: records.into_iter(),
            failed: false,
        }
    }

    /// End of input. An unfinished pull produces no record.
    pub fn finish(self) -> u32 {
        if let EncounterState::InProgress { phase, .. } = self.state {
            debug!(phase, "Input ended mid pull, discarding attempt");
        }
        self.pulls_emitted
    }

    fn check_phase_gate(&mut self, target_name: &str) {
        let EncounterState::InProgress { phase, .. } = &mut self.state else {
            return;
        };
        if *phase < MAX_PHASE && self.definition.gate_for(*phase) == Some(target_name) {
            *phase += 1;
            debug!(phase = *phase, gate = target_name, "Phase advanced");
        }
    }

    fn close(&mut self, record: &SourcedLine) -> Result<Option<PullRecord>, SegmentError> {
        let EncounterState::InProgress { start_time, phase } = self.state else {
            return Ok(None);
        };
        // the attempt is over whether or not the wipe is usable
        self.state = EncounterState::Idle;

        let end_time = timestamp_of(record)?;
        let duration = end_time.signed_duration_since(start_time);

        if duration <= self.definition.minimum_pull_duration() {
            debug!(
                secs = duration.num_seconds(),
                phase,
                file = %record.source_file,
                "Discarding short pull"
            );
            return Ok(None);
        }

        self.pulls_emitted += 1;
        let pull = PullRecord {
            ordinal: self.pulls_emitted,
            duration,
            final_phase: phase,
            file_index: record.file_index,
            source_file: record.source_file.clone(),
        };
        debug!(
            ordinal = pull.ordinal,
            secs = duration.num_seconds(),
            phase,
            "Pull recorded"
        );
        Ok(Some(pull))
    }
}

fn timestamp_of(record: &SourcedLine) -> Result<NaiveDateTime, SegmentError> {
    record
        .line
        .timestamp
        .ok_or_else(|| SegmentError::InvalidTimestamp {
            source_file: record.source_file.clone(),
            line_number: record.line.line_number,
        })
}

/// Lazy pull stream over a line iterator. Stops after the first error.
pub struct Pulls<I> {
    segmenter: PullSegmenter,
    records: I,
    failed: bool,
}

impl<I> Iterator for Pulls<I>
where
    I: Iterator<Item = SourcedLine>,
{
    type Item = Result<PullRecord, SegmentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for record in self.records.by_ref() {
            match self.segmenter.process(&record) {
                Ok(Some(pull)) => return Some(Ok(pull)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Segment a whole line stream in one pass.
pub fn segment<I>(
    definition: EncounterDefinition,
    records: I,
) -> Result<Vec<PullRecord>, SegmentError>
where
    I: IntoIterator<Item = SourcedLine>,
{
    PullSegmenter::new(definition)?.pulls(records).collect()
}
