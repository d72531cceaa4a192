use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use bus::{RebrandCommand, RebrandEvent};
use engine::{Session, SessionError};

/// Run `session` on its own thread: bootstrap it, then serve commands until
/// `Shutdown` or until every command sender is gone. Engine events are
/// forwarded after each command.
pub fn start_rebrand_runtime(
    mut session: Session,
    cmd_rx: Receiver<RebrandCommand>,
    evt_tx: Sender<RebrandEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        report(session.start());
        forward_events(&mut session, &evt_tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                RebrandCommand::GetConfig { reply } => {
                    let _ = reply.send(session.engine().config().cloned());
                }
                RebrandCommand::Refresh => report(session.refresh().map(drop)),
                RebrandCommand::ReloadConfig => report(session.reload_config().map(drop)),
                RebrandCommand::Navigate(kind) => report(session.navigate(kind).map(drop)),
                RebrandCommand::ColorSchemeChanged { dark } => {
                    report(session.set_prefers_dark(dark).map(drop))
                }
                RebrandCommand::Advance { ms } => report(session.advance(ms).map(drop)),
                RebrandCommand::Snapshot { cap, reply } => {
                    let _ = reply.send(session.outline(cap));
                }
                RebrandCommand::Shutdown => break,
            }
            forward_events(&mut session, &evt_tx);
        }
        log::debug!(target: "rebrand.runtime", "runtime stopped at {}ms", session.now());
    })
}

fn report<T>(result: Result<T, SessionError>) {
    if let Err(err) = result {
        log::error!(target: "rebrand.runtime", "{err}");
    }
}

fn forward_events(session: &mut Session, evt_tx: &Sender<RebrandEvent>) {
    for event in session.engine_mut().take_events() {
        // receiver gone: nobody is listening any more
        if evt_tx.send(event).is_err() {
            break;
        }
    }
}
