use crate::media::{MediaConnection, MediaConnector, MediaEvent};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use trellis_core::{
    IceCandidate, IceServerConfig, LocalTrack, PeerId, RemoteStream, SessionDescription, TrackKind,
};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

/// Production [`MediaConnector`] backed by the `webrtc` crate.
pub struct RtcConnector {
    ice_servers: Vec<IceServerConfig>,
}

impl RtcConnector {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self { ice_servers }
    }
}

#[async_trait]
impl MediaConnector for RtcConnector {
    async fn open(
        &self,
        peer_id: PeerId,
        events: mpsc::Sender<MediaEvent>,
    ) -> Result<Arc<dyn MediaConnection>> {
        let conn = RtcConnection::new(peer_id, self.ice_servers.clone(), events).await?;
        Ok(Arc::new(conn))
    }
}

/// One `RTCPeerConnection`, with its callbacks forwarding into the session
/// loop's event channel.
pub struct RtcConnection {
    peer_connection: Arc<RTCPeerConnection>,
}

impl RtcConnection {
    pub async fn new(
        peer_id: PeerId,
        ice_servers: Vec<IceServerConfig>,
        event_tx: mpsc::Sender<MediaEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .into_iter()
                .map(|server| RTCIceServer {
                    urls: server.urls,
                    username: server.username.unwrap_or_default(),
                    credential: server.credential.unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        // Connection health: failed/disconnected forces entry teardown.
        let state_tx = event_tx.clone();
        let state_peer = peer_id.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let peer = state_peer.clone();

                Box::pin(async move {
                    info!("connection state for {}: {:?}", peer, s);
                    match s {
                        RTCPeerConnectionState::Failed
                        | RTCPeerConnectionState::Disconnected
                        | RTCPeerConnectionState::Closed => {
                            let _ = tx.send(MediaEvent::ConnectionLost(peer)).await;
                        }
                        _ => {}
                    }
                })
            },
        ));

        // Trickle ICE: locally discovered candidates go out right away.
        let ice_tx = event_tx.clone();
        let ice_peer = peer_id.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let peer = ice_peer.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                let _ = tx
                    .send(MediaEvent::CandidateDiscovered(peer, candidate))
                    .await;
            })
        }));

        // Remote media arriving for this peer.
        let track_tx = event_tx.clone();
        let track_peer = peer_id.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>, _receiver, _transceiver| {
                let tx = track_tx.clone();
                let peer = track_peer.clone();

                Box::pin(async move {
                    let stream = RemoteStream::new(track.stream_id());
                    let _ = tx.send(MediaEvent::TrackReceived(peer, stream)).await;
                })
            },
        ));

        Ok(Self { peer_connection })
    }
}

#[async_trait]
impl MediaConnection for RtcConnection {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_local_description(to_rtc_description(desc)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_remote_description(to_rtc_description(desc)?)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(RTCIceCandidateInit {
                candidate: candidate.candidate,
                sdp_mid: candidate.sdp_mid,
                sdp_mline_index: candidate.sdp_m_line_index,
                username_fragment: None,
            })
            .await?;
        Ok(())
    }

    async fn add_track(&self, track: &LocalTrack) -> Result<()> {
        let capability = match track.kind {
            TrackKind::Audio => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                ..Default::default()
            },
            TrackKind::Video => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                ..Default::default()
            },
        };
        let local = TrackLocalStaticSample::new(capability, track.id.clone(), "trellis".to_owned());
        self.peer_connection.add_track(Arc::new(local)).await?;
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.peer_connection.close().await {
            warn!("error closing peer connection: {}", e);
        }
    }
}

fn to_rtc_description(desc: SessionDescription) -> Result<RTCSessionDescription> {
    let rtc = match desc.kind {
        trellis_core::SdpType::Offer => RTCSessionDescription::offer(desc.sdp)?,
        trellis_core::SdpType::Answer => RTCSessionDescription::answer(desc.sdp)?,
    };
    Ok(rtc)
}
