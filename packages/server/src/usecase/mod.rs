//! UseCase 層
//!
//! ドメインモデルを組み合わせて、接続・登録・チャット・モデレーションなどの
//! アプリケーション固有の処理を実装します。

pub mod broadcaster;
pub mod connect_participant;
pub mod context;
pub mod disconnect_participant;
pub mod dispatch_event;
pub mod get_history;
pub mod get_moderation_state;
pub mod get_participants;
pub mod history_writer;
pub mod moderate;
pub mod register_participant;
pub mod relay_typing;
pub mod rename_participant;
pub mod scheduler;
pub mod send_message;
pub mod send_private_message;
pub mod sweep_idle;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcaster::Broadcaster;
pub use connect_participant::ConnectParticipantUseCase;
pub use context::{SessionContext, ShutdownTrigger};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use dispatch_event::DispatchEventUseCase;
pub use get_history::GetHistoryUseCase;
pub use get_moderation_state::{GetModerationStateUseCase, ModerationSnapshot};
pub use get_participants::GetParticipantsUseCase;
pub use history_writer::HistoryWriter;
pub use moderate::ModerateUseCase;
pub use register_participant::RegisterParticipantUseCase;
pub use relay_typing::RelayTypingUseCase;
pub use rename_participant::RenameParticipantUseCase;
pub use scheduler::TaskScheduler;
pub use send_message::SendMessageUseCase;
pub use send_private_message::SendPrivateMessageUseCase;
pub use sweep_idle::{SweepIdleUseCase, spawn_idle_monitor};
