//! Shared three-service cluster harness for integration tests.

use std::sync::Arc;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use atrium_server::{ActivityService, ReservationService, RoomService, Service, serve};
use atrium_store::JsonFileStore;
use atrium_wire::WireClient;

/// A full cluster on ephemeral ports, stores in a temp directory.
pub struct TestCluster {
    pub room_addr: String,
    pub activity_addr: String,
    pub reservation_addr: String,
    data_dir: TempDir,
}

impl TestCluster {
    /// Bind all three listeners, open the services against a shared
    /// temp data directory, and run each accept loop in the
    /// background.
    pub async fn start() -> Self {
        let data_dir = TempDir::new().unwrap();

        let room_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let room_addr = room_listener.local_addr().unwrap().to_string();
        let activity_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let activity_addr = activity_listener.local_addr().unwrap().to_string();
        let reservation_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let reservation_addr = reservation_listener.local_addr().unwrap().to_string();

        let room: Arc<dyn Service> =
            Arc::new(RoomService::open(JsonFileStore::new(data_dir.path())).unwrap());
        let activity: Arc<dyn Service> =
            Arc::new(ActivityService::open(JsonFileStore::new(data_dir.path())).unwrap());
        let reservation: Arc<dyn Service> = Arc::new(
            ReservationService::open(
                JsonFileStore::new(data_dir.path()),
                WireClient::new(),
                room_addr.clone(),
                activity_addr.clone(),
            )
            .unwrap(),
        );

        tokio::spawn(serve(room_listener, room));
        tokio::spawn(serve(activity_listener, activity));
        tokio::spawn(serve(reservation_listener, reservation));

        Self {
            room_addr,
            activity_addr,
            reservation_addr,
            data_dir,
        }
    }

    /// Fresh handle onto the cluster's data directory, for asserting
    /// against what the services persisted.
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(self.data_dir.path())
    }

    /// Send one raw request and collect the full response.
    pub async fn request(addr: &str, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}
