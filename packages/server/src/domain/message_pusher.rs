//! MessagePusher trait 定義
//!
//! 接続中のクライアントへイベントを届けるためのインターフェース。
//! エンコード（JSON など）と送信手段は Infrastructure 層が決めます。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, SessionEvent};

/// クライアントへの送信チャンネル（エンコード済みのフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// クライアントを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 登録中の全クライアント ID を取得
    async fn registered_clients(&self) -> Vec<ConnectionId>;

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &SessionEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &SessionEvent,
    ) -> Result<(), MessagePushError>;
}
