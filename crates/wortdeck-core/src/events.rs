use wortdeck_generator::GenerateError;
use wortdeck_media::MediaError;
use wortdeck_types::{MediaRef, WordProfile};

/// Anything a background job can fail with. Caught at the job boundary and
/// delivered as the error side of a [`GenerationEvent`]; nothing escapes a
/// job task as an unhandled fault.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Media produced by one audio job. `examples` pairs with the profile's
/// example list by index.
#[derive(Debug, Clone)]
pub struct AudioBundle {
    pub word: MediaRef,
    pub examples: Vec<MediaRef>,
}

/// Terminal job outcome, delivered exactly once per job over the event
/// channel back to the coordination loop. Each event carries the request id
/// it originated from; results tagged with a superseded id are discarded.
#[derive(Debug)]
pub enum GenerationEvent {
    ProfileFinished {
        request_id: u64,
        result: Result<WordProfile, JobError>,
    },
    AudioFinished {
        request_id: u64,
        result: Result<AudioBundle, JobError>,
    },
    ImageFinished {
        request_id: u64,
        result: Result<MediaRef, JobError>,
    },
}
