//! Server state shared by every handler.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, DispatchEventUseCase,
    GetHistoryUseCase, GetModerationStateUseCase, GetParticipantsUseCase, SessionContext,
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（接続時の履歴再生・一覧送信）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（切断時の後片付け）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// DispatchEventUseCase（受信イベントの振り分け）
    pub dispatch_event_usecase: Arc<DispatchEventUseCase>,
    pub get_participants_usecase: Arc<GetParticipantsUseCase>,
    pub get_moderation_state_usecase: Arc<GetModerationStateUseCase>,
    pub get_history_usecase: Arc<GetHistoryUseCase>,
}

impl AppState {
    /// Build every use case over one shared session context.
    pub fn from_context(ctx: &SessionContext) -> Self {
        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(ctx.clone())),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                ctx.clone(),
            )),
            dispatch_event_usecase: Arc::new(DispatchEventUseCase::new(ctx.clone())),
            get_participants_usecase: Arc::new(GetParticipantsUseCase::new(ctx.clone())),
            get_moderation_state_usecase: Arc::new(GetModerationStateUseCase::new(ctx.clone())),
            get_history_usecase: Arc::new(GetHistoryUseCase::new(ctx.clone())),
        }
    }
}
