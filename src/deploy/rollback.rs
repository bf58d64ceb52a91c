// ABOUTME: Compensating action for failed rollouts.
// ABOUTME: Force-scales an app to zero so a broken version stops serving.

use crate::control_plane::{ControlPlane, Scale};
use crate::types::AppId;

/// Best-effort forced scale to zero.
///
/// A failure here is logged and swallowed so it never masks the error that
/// triggered it.
pub async fn take_out_of_service<C: ControlPlane + ?Sized>(control_plane: &C, app: &AppId) {
    tracing::warn!(%app, "cancelling deployment, scaling app to zero");
    if let Err(e) = control_plane.scale_app(app, Scale::to_zero_forced()).await {
        tracing::warn!(%app, "failed to scale app to zero: {e}");
    }
}
