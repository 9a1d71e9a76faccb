use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kirana Market API",
        version = "1.0.0",
        description = "Local marketplace backend. Customers browse nearby stores, book catalog items, request items no store lists yet, and chat with shopkeepers. Shopkeepers manage their catalog and respond to bookings.\n\n**Authentication:** phone + password login per role; no tokens, the client keeps the logged-in user locally.",
        contact(
            name = "Kirana Market Team",
            email = "support@kirana-market.local"
        )
    ),
    paths(
        // Auth
        crate::api::auth::customer_register,
        crate::api::auth::customer_login,
        crate::api::auth::register_shop,
        crate::api::auth::shopkeeper_login,

        // Health
        crate::api::health::health_check,

        // Stores & customers
        crate::api::stores::get_stores,
        crate::api::stores::update_store,
        crate::api::customers::get_customers,
        crate::api::customers::update_customer,

        // Catalog
        crate::api::products::add_product,
        crate::api::products::update_product,
        crate::api::products::delete_product,

        // Bookings & requests
        crate::api::bookings::get_bookings,
        crate::api::bookings::book_item,
        crate::api::bookings::update_booking_status,
        crate::api::requests::get_requests,
        crate::api::requests::request_item,

        // Chats
        crate::api::chats::get_chats,
        crate::api::chats::save_chat,
    ),
    components(
        schemas(
            // Shared
            crate::models::MessageResponse,
            crate::api::health::HealthResponse,

            // Auth
            crate::models::RegisterCustomerRequest,
            crate::models::LoginRequest,
            crate::models::CustomerLoginResponse,
            crate::models::ShopkeeperLoginResponse,
            crate::models::RegisterShopRequest,
            crate::models::RegisterShopResponse,

            // Stores & customers
            crate::models::Store,
            crate::models::StoreCategory,
            crate::models::StoresResponse,
            crate::models::UpdateStoreRequest,
            crate::models::Customer,
            crate::models::AccountStatus,
            crate::models::CustomersResponse,
            crate::models::UpdateCustomerRequest,

            // Catalog
            crate::models::Product,
            crate::models::AddProductRequest,
            crate::models::UpdateProductRequest,
            crate::models::DeleteProductRequest,

            // Bookings & requests
            crate::models::Booking,
            crate::models::BookingStatus,
            crate::models::BookItemRequest,
            crate::models::BookItemResponse,
            crate::models::BookingsResponse,
            crate::models::UpdateBookingStatusRequest,
            crate::models::ItemRequest,
            crate::models::RequestItemRequest,
            crate::models::RequestItemResponse,
            crate::models::RequestsResponse,

            // Chats
            crate::models::ParticipantKind,
            crate::models::ChatMessage,
            crate::models::Chat,
            crate::models::SaveChatRequest,
            crate::models::ChatsResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration and login for customers and shopkeepers. Phone number is the login id; passwords are stored as bcrypt hashes and never returned."),
        (name = "Health", description = "Health check endpoint for monitoring."),
        (name = "Stores", description = "Store directory and shopkeeper profile updates."),
        (name = "Customers", description = "Customer directory and profile updates."),
        (name = "Products", description = "Catalog management. Products are addressed by index within their store."),
        (name = "Bookings", description = "Item reservations and their status lifecycle (pending, accepted, rejected, completed)."),
        (name = "Requests", description = "Customer requests for items no store currently lists."),
        (name = "Chats", description = "Customer/shopkeeper conversations keyed by an order-independent chat id."),
    )
)]
pub struct ApiDoc;
