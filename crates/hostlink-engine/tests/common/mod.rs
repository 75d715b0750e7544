pub mod fakes;

use hostlink_core::platform::Context;
use hostlink_core::settings::EngineSettings;
use hostlink_engine::{Engine, EngineBuilder, EngineSlot};

use fakes::{call_log, CallLog, FakeHost, FakePlatform, RecordingApp};

/// Shot context belonging to project 1
#[allow(dead_code)]
pub fn shot_a() -> Context {
    Context::new("Shot:10", "Shot 010").with_project("Project:1")
}

/// Another shot of project 1
#[allow(dead_code)]
pub fn shot_b() -> Context {
    Context::new("Shot:20", "Shot 020").with_project("Project:1")
}

/// Fakes and call log behind a test engine
#[allow(dead_code)]
pub struct Rig {
    pub host: FakeHost,
    pub platform: FakePlatform,
    pub log: CallLog,
    pub slot: EngineSlot,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_host(FakeHost::new())
    }

    pub fn with_host(host: FakeHost) -> Self {
        Self {
            host,
            platform: FakePlatform::new(),
            log: call_log(),
            slot: EngineSlot::new(),
        }
    }

    /// Builder with the standard two test apps installed
    pub fn builder(&self, settings: EngineSettings) -> EngineBuilder {
        EngineBuilder::new(
            Box::new(self.host.clone()),
            Box::new(self.platform.clone()),
            Some(shot_a()),
        )
        .settings(settings)
        .slot(self.slot.clone())
        .app(Box::new(
            RecordingApp::new(
                "tk-multi-workfiles2",
                &["File Open...", "File Save..."],
                self.log.clone(),
            )
            .with_context_command("Jump to Site"),
        ))
        .app(Box::new(RecordingApp::new(
            "tk-multi-publish2",
            &["Publish..."],
            self.log.clone(),
        )))
    }

    /// Engine that went through pre_init and app_init
    pub fn running(&self, settings: EngineSettings) -> Engine {
        let mut engine = self.builder(settings).build();
        engine.pre_init().unwrap();
        engine.app_init().unwrap();
        engine
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}
