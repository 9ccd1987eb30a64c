use std::time::Duration;

use log::{debug, warn};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::message::model::MessageDto;
use crate::{admin, group};

use super::service::SyncService;

/// Default polling cadence while a group is open.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

const SNAPSHOT_BUFFER: usize = 8;

/// A polling loop bound to one open group. The session owns its timer and
/// stops on an explicit signal: `stop()`, dropping the handle, or dropping
/// the snapshot receiver all terminate the task deterministically. A poll
/// that fails (group deleted mid-session, membership revoked) ends the
/// session rather than retrying.
pub struct PollSession {
    cancel: watch::Sender<bool>,
}

impl PollSession {
    pub fn open(
        service: SyncService,
        group_id: group::Id,
        admin_id: admin::Id,
        every: Duration,
    ) -> (Self, mpsc::Receiver<Vec<MessageDto>>) {
        let (cancel, mut cancelled) = watch::channel(false);
        let (snapshots, updates) = mpsc::channel(SNAPSHOT_BUFFER);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match service.messages(&group_id, &admin_id).await {
                            Ok(snapshot) => {
                                if snapshots.send(snapshot).await.is_err() {
                                    debug!("poll session for group {group_id} lost its subscriber");
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("poll for group {group_id} failed, ending session: {e}");
                                break;
                            }
                        }
                    }
                    // Fires on stop() and when the handle is dropped.
                    _ = cancelled.changed() => {
                        debug!("poll session for group {group_id} cancelled");
                        break;
                    }
                }
            }
        });

        (Self { cancel }, updates)
    }

    pub fn stop(&self) {
        let _ = self.cancel.send(true);
    }
}
