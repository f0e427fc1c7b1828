//! Progress reporting seam between the import job and its host.

/// Receives job progress. Best-effort: nothing here can fail the job.
pub trait ProgressSink {
    fn begin(&mut self, total: usize);
    fn update(&mut self, current: usize);
    fn end(&mut self);
}

impl<P: ProgressSink + ?Sized> ProgressSink for &mut P {
    fn begin(&mut self, total: usize) {
        (**self).begin(total);
    }

    fn update(&mut self, current: usize) {
        (**self).update(current);
    }

    fn end(&mut self) {
        (**self).end();
    }
}

impl<P: ProgressSink + ?Sized> ProgressSink for Box<P> {
    fn begin(&mut self, total: usize) {
        (**self).begin(total);
    }

    fn update(&mut self, current: usize) {
        (**self).update(current);
    }

    fn end(&mut self) {
        (**self).end();
    }
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&mut self, _total: usize) {}
    fn update(&mut self, _current: usize) {}
    fn end(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Begin(usize),
    Update(usize),
    End,
}

/// Keeps every call it receives, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    pub events: Vec<ProgressEvent>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Begin(_)))
    }

    pub fn end_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::End))
    }

    pub fn updates(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Update(current) => Some(*current),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl ProgressSink for RecordingProgress {
    fn begin(&mut self, total: usize) {
        self.events.push(ProgressEvent::Begin(total));
    }

    fn update(&mut self, current: usize) {
        self.events.push(ProgressEvent::Update(current));
    }

    fn end(&mut self) {
        self.events.push(ProgressEvent::End);
    }
}
