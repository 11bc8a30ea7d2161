//! Paths and fixed request constants for the provider's HTTP API.
//!
//! All values are opaque provider-side constants observed on the wire. The two
//! backend surfaces use different envelope conventions: the app gateway
//! (`/api/...`) answers with lower-case `code`/`message`/`data`, the CIS
//! portal (`/cis/...`) with upper-case `CODE`/`DESC`/`DATA`.

/// App gateway: login with phone + password.
pub const LOGIN_PATH: &str = "/api/app/login";

/// App gateway: session-priming call whose response is discarded. The portal
/// rejects later calls unless this one was made first.
pub const CART_PROBE_PATH: &str = "/api/cart/getCart";

/// App gateway: customer records bound to a phone number.
pub const CUSTOMER_LOOKUP_PATH: &str = "/api/app/queryCustInfo";

/// App gateway: switch the session to a customer number, re-issuing the token.
pub const ACCOUNT_SWITCH_PATH: &str = "/api/app/userSwitchHandler";

/// CIS portal: exchange the gateway token for a portal authorization.
pub const AUTHORIZATION_PATH: &str = "/cis/ec_wa_wechatf/app/azLogOn";

/// CIS portal: prepaid balances for all bound consumption points.
pub const BALANCE_PATH: &str = "/cis/ec_wa_wechatf/weChatRest/queryInBindConsDetails";

/// CIS portal: planned service-interruption announcements.
pub const INTERRUPTION_PATH: &str = "/cis/ec_wa_wechatf/sysRest/connmnRest";

/// Success value of the gateway's `code` field.
pub const GATEWAY_OK: &str = "200";

/// Success value of the portal's `CODE` field.
pub const PORTAL_OK: &str = "0";

/// Login channel selector sent in the login body.
pub const LOGIN_TYPE: u8 = 3;

/// Fixed push-client identifier required by the authorization exchange.
pub const PUSH_CLIENT_ID: &str = "dcb599c4c9caee2c3aee45a17f069126";

/// Organization codes queried by the interruption fetch.
pub const ORG_NO: &str = "AZ001,AZ002,AZ003,AZ004";

/// Release-style code for the interruption fetch.
pub const RELE_STYLE: &str = "06";

/// Protocol version tag (`zsazVersion`) for the interruption fetch.
pub const APP_VERSION: u32 = 4_000_020;

/// Service identifier for the interruption fetch.
pub const SERVICE_ID: &str = "RMT018";

/// Sequence number for the interruption fetch.
pub const SERVICE_SN: &str = "900720250428131005328125";

/// Service id prefix for the interruption fetch.
pub const SERVICE_SID: &str = "9007";

/// Service-type label marking a water binding.
pub const CONS_TYPE_WATER: &str = "水";

/// Service-type label marking a gas binding.
pub const CONS_TYPE_GAS: &str = "气";

/// Energy-type label on interruption notices that concern water service.
pub const ENERGY_TYPE_WATER: &str = "水务";
